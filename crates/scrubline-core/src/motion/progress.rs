//! Raw input coordinate to normalized timeline progress

use crate::config::{Bounds, ProgressMode};
use crate::diagnostics::RuntimeWarning;

/// Result of mapping one raw input value
#[derive(Debug, Clone, PartialEq)]
pub struct MappedProgress {
    /// Bounded: [0, 1]. Wrapping: [0, 1).
    pub value: f64,
    /// Set when the input could not be mapped and `value` fell back to 0
    pub warning: Option<RuntimeWarning>,
}

impl MappedProgress {
    fn ok(value: f64) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    fn fallback(warning: RuntimeWarning) -> Self {
        Self {
            value: 0.0,
            warning: Some(warning),
        }
    }
}

pub struct ProgressMapper;

impl ProgressMapper {
    pub fn map(raw_input: f64, mode: ProgressMode, bounds: Bounds) -> MappedProgress {
        let span = bounds.span();
        if span == 0.0 || !span.is_finite() {
            return MappedProgress::fallback(RuntimeWarning::DegenerateBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        if !raw_input.is_finite() {
            return MappedProgress::fallback(RuntimeWarning::NonFiniteInput { value: raw_input });
        }

        let fraction = (raw_input - bounds.min) / span;
        let value = match mode {
            ProgressMode::Bounded => fraction.clamp(0.0, 1.0),
            ProgressMode::Wrapping => wrap_unit(fraction),
        };
        MappedProgress::ok(value)
    }

    /// Raw coordinate whose mapped progress is `progress`
    pub fn unmap(progress: f64, bounds: Bounds) -> f64 {
        bounds.min + progress * bounds.span()
    }

    /// Which pass of a wrapping timeline `raw_input` falls in
    pub fn cycle_index(raw_input: f64, bounds: Bounds) -> i64 {
        let span = bounds.span();
        if span == 0.0 || !span.is_finite() || !raw_input.is_finite() {
            return 0;
        }
        ((raw_input - bounds.min) / span).floor() as i64
    }
}

/// Euclidean remainder into [0, 1)
///
/// `%` keeps the sign of the dividend, so -0.1 % 1.0 is -0.1. `rem_euclid`
/// is the true modulo but can round tiny negatives up to exactly 1.0.
#[inline]
fn wrap_unit(x: f64) -> f64 {
    let r = x.rem_euclid(1.0);
    if r >= 1.0 {
        0.0
    } else {
        r
    }
}
