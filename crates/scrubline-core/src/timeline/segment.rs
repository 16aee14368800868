use std::fmt;

/// Render callback; receives local progress in [0, 1]
pub type ApplyFn = Box<dyn FnMut(f64) -> crate::Result<()>>;

pub struct Segment {
    label: String,
    start: f64,
    end: f64,
    apply: ApplyFn,
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("label", &self.label)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

impl Segment {
    /// Create a segment covering `[start, end)` of the timeline
    ///
    /// Requires `0 <= start < end <= 1`.
    pub fn new<F>(label: impl Into<String>, start: f64, end: f64, apply: F) -> crate::Result<Self>
    where
        F: FnMut(f64) -> crate::Result<()> + 'static,
    {
        let label = label.into();
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end > 1.0 || start >= end {
            return Err(crate::Error::Config(format!(
                "segment '{}' has invalid range [{}, {}); expected 0 <= start < end <= 1",
                label, start, end
            )));
        }

        Ok(Self {
            label,
            start,
            end,
            apply: Box::new(apply),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start_fraction(&self) -> f64 {
        self.start
    }

    pub fn end_fraction(&self) -> f64 {
        self.end
    }

    /// Whether the segment renders at global `progress` (already in [0, 1])
    ///
    /// Ranges are half-open, except that a segment ending at 1.0 also owns
    /// progress 1.0 itself.
    #[inline]
    pub fn is_active(&self, progress: f64) -> bool {
        (self.start <= progress && progress < self.end) || (progress >= 1.0 && self.end >= 1.0)
    }

    /// Local progress within the segment, clamped to [0, 1]
    #[inline]
    pub fn local_t(&self, progress: f64) -> f64 {
        ((progress - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    pub(crate) fn invoke(&mut self, local_t: f64) -> crate::Result<()> {
        (self.apply)(local_t)
    }
}
