//! Pure easing functions
//!
//! Maps input [0, 1] to output [0, 1] with various deceleration curves.

use std::collections::HashMap;

pub use crate::config::EasingType;

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
        }
    }

    /// Every curve, in declaration order
    pub const ALL: [EasingType; 5] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Read-only lookup from easing names to curves
///
/// Configuration files and the simulate command resolve easing names
/// through it, so aliases like `ease-out-cubic` work everywhere.
#[derive(Debug, Clone)]
pub struct EasingRegistry {
    entries: HashMap<String, EasingType>,
}

impl Default for EasingRegistry {
    fn default() -> Self {
        let entries = [
            ("none", EasingType::None),
            ("linear", EasingType::Linear),
            ("cubic", EasingType::Cubic),
            ("ease-out-cubic", EasingType::Cubic),
            ("quintic", EasingType::Quintic),
            ("ease-out-quint", EasingType::Quintic),
            ("ease-out", EasingType::EaseOut),
            ("ease-out-expo", EasingType::EaseOut),
        ]
        .into_iter()
        .map(|(name, easing)| (name.to_string(), easing))
        .collect();

        Self { entries }
    }
}

impl EasingRegistry {
    /// Resolve a name, case-insensitively
    pub fn get(&self, name: &str) -> Option<EasingType> {
        self.entries.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Every known name, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
