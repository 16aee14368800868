//! Time calculation utilities for frame-driven animation
//!
//! Pure functions; elapsed time is always passed in explicitly so callers
//! can drive them from a real frame clock or a test loop.

/// Fraction of `duration_ms` covered by `elapsed_ms`
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]. A non-positive duration counts as complete.
#[inline]
pub fn elapsed_fraction(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Check if an animation of `duration_ms` is complete after `elapsed_ms`
#[inline]
pub fn is_complete(elapsed_ms: f64, duration_ms: f64) -> bool {
    elapsed_ms >= duration_ms
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Absolute-difference float comparison
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
