//! Velocity to playback rate, and the path back to baseline
//!
//! The resolver only describes what should happen. Sampling a `DecayPlan`
//! over time is the controller's job, which keeps this synchronous.

use serde::{Deserialize, Serialize};

use super::easing::EasingType;
use super::timing::{elapsed_fraction, is_complete, lerp};
use super::velocity::VelocityEstimate;

/// Steady-state playback rate every decay returns to
pub const BASELINE_RATE: f64 = 1.0;

/// Options consumed by `InertiaResolver::resolve`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaConfig {
    pub max_rate: f64,
    pub min_rate: f64,
    pub velocity_to_rate_scale: f64,
    pub decay_duration_ms: f64,
    pub invert_direction: bool,
    pub decay_easing: EasingType,
}

impl InertiaConfig {
    /// +1.0, or -1.0 when decreasing positions mean forward playback
    #[inline]
    pub fn direction(&self) -> f64 {
        if self.invert_direction {
            -1.0
        } else {
            1.0
        }
    }
}

/// Eased trajectory from a fling rate back to baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayPlan {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub easing: EasingType,
}

impl DecayPlan {
    /// Rate after `elapsed_ms` of decay
    ///
    /// Stays between `from` and `to` and lands on `to` exactly once the
    /// duration has passed, so the rate never overshoots the baseline.
    pub fn sample(&self, elapsed_ms: f64) -> f64 {
        if is_complete(elapsed_ms, self.duration_ms) {
            return self.to;
        }
        let t = elapsed_fraction(elapsed_ms, self.duration_ms);
        let value = lerp(self.from, self.to, self.easing.apply(t));
        let (low, high) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        value.max(low).min(high)
    }

    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        is_complete(elapsed_ms, self.duration_ms)
    }
}

/// Outcome of resolving one velocity estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub target_rate: f64,
    pub decay_plan: DecayPlan,
    /// The unclamped rate fell outside [min_rate, max_rate]
    pub clamped: bool,
}

pub struct InertiaResolver;

impl InertiaResolver {
    pub fn resolve(velocity: VelocityEstimate, config: &InertiaConfig) -> Resolution {
        let raw = config.direction() * velocity.value * config.velocity_to_rate_scale;
        let raw = if raw.is_finite() { raw } else { 0.0 };
        let (low, high) = rate_limits(config);
        let target_rate = raw.clamp(low, high);

        Resolution {
            target_rate,
            decay_plan: DecayPlan {
                from: target_rate,
                to: BASELINE_RATE,
                duration_ms: config.decay_duration_ms,
                easing: config.decay_easing,
            },
            clamped: target_rate != raw,
        }
    }
}

/// Rate limits in ascending order, with a NaN limit left open
///
/// `InertiaConfig` can be built without validation, and `f64::clamp`
/// panics on reversed or NaN bounds.
fn rate_limits(config: &InertiaConfig) -> (f64, f64) {
    let low = if config.min_rate.is_nan() { f64::NEG_INFINITY } else { config.min_rate };
    let high = if config.max_rate.is_nan() { f64::INFINITY } else { config.max_rate };
    (low.min(high), low.max(high))
}
