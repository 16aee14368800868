use super::{Segment, Timeline};

/// Fluent construction of a `Timeline`
///
/// Range errors are held until `build()` so chains stay readable; the first
/// one wins.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    segments: Vec<Segment>,
    error: Option<crate::Error>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one segment covering `[start, end)`
    pub fn segment<F>(mut self, label: impl Into<String>, start: f64, end: f64, apply: F) -> Self
    where
        F: FnMut(f64) -> crate::Result<()> + 'static,
    {
        self.push(Segment::new(label, start, end, apply));
        self
    }

    /// Add `count` staggered segments labeled `{prefix}-{i}`
    ///
    /// Segment `i` starts at `i * step` and lasts `each`. `make_apply` is
    /// called once per segment with its index. Overlap is allowed, which is
    /// how cascading reveals are usually laid out.
    pub fn stagger<M, F>(mut self, prefix: &str, count: usize, each: f64, step: f64, mut make_apply: M) -> Self
    where
        M: FnMut(usize) -> F,
        F: FnMut(f64) -> crate::Result<()> + 'static,
    {
        for i in 0..count {
            let (start, end) = stagger_range(i, each, step);
            let label = format!("{}-{}", prefix, i);
            self.push(Segment::new(label, start, end, make_apply(i)));
        }
        self
    }

    /// Spread `count` segments evenly so the last one ends at 1.0
    ///
    /// `overlap` in [0, 1) is the fraction of each segment shared with the next.
    pub fn stagger_evenly<M, F>(mut self, prefix: &str, count: usize, overlap: f64, mut make_apply: M) -> Self
    where
        M: FnMut(usize) -> F,
        F: FnMut(f64) -> crate::Result<()> + 'static,
    {
        for (i, (start, end)) in Self::even_ranges(count, overlap).into_iter().enumerate() {
            let label = format!("{}-{}", prefix, i);
            self.push(Segment::new(label, start, end, make_apply(i)));
        }
        self
    }

    /// The `[start, end)` ranges `stagger_evenly` lays out
    ///
    /// Hosts that want a target to keep its final state outside its range
    /// can register a full-length segment and map progress through these.
    pub fn even_ranges(count: usize, overlap: f64) -> Vec<(f64, f64)> {
        if count == 0 {
            return Vec::new();
        }
        let overlap = if overlap.is_nan() { 0.0 } else { overlap.clamp(0.0, 0.95) };
        // count segments of length `each`, advancing by each * (1 - overlap)
        let each = 1.0 / (1.0 + (count as f64 - 1.0) * (1.0 - overlap));
        let step = each * (1.0 - overlap);
        (0..count).map(|i| stagger_range(i, each, step)).collect()
    }

    pub fn build(self) -> crate::Result<Timeline> {
        match self.error {
            Some(error) => Err(error),
            None => Timeline::new(self.segments),
        }
    }

    fn push(&mut self, segment: crate::Result<Segment>) {
        match segment {
            Ok(segment) => self.segments.push(segment),
            Err(error) => {
                if self.error.is_none() {
                    self.error = Some(error);
                }
            }
        }
    }
}

fn stagger_range(index: usize, each: f64, step: f64) -> (f64, f64) {
    let start = index as f64 * step;
    let end = start + each;
    // Accumulated float error must not push the last segment past 1.0
    if (end - 1.0).abs() < 1e-9 {
        (start, 1.0)
    } else {
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineEngine;

    fn noop(_: usize) -> impl FnMut(f64) -> crate::Result<()> {
        |_| Ok(())
    }

    #[test]
    fn test_builder_collects_segments() {
        let timeline = TimelineBuilder::new()
            .segment("a", 0.0, 0.5, |_| Ok(()))
            .segment("b", 0.5, 1.0, |_| Ok(()))
            .build()
            .unwrap();
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_builder_reports_first_error() {
        let err = TimelineBuilder::new()
            .segment("ok", 0.0, 0.5, |_| Ok(()))
            .segment("backwards", 0.8, 0.2, |_| Ok(()))
            .segment("too-long", 0.5, 2.0, |_| Ok(()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("backwards"));
    }

    #[test]
    fn test_empty_builder_fails() {
        assert!(TimelineBuilder::new().build().is_err());
    }

    #[test]
    fn test_stagger_layout() {
        let timeline = TimelineBuilder::new()
            .stagger("line", 3, 0.5, 0.25, noop)
            .build()
            .unwrap();

        assert_eq!(timeline.range_of("line-0"), Some((0.0, 0.5)));
        assert_eq!(timeline.range_of("line-1"), Some((0.25, 0.75)));
        assert_eq!(timeline.range_of("line-2"), Some((0.5, 1.0)));

        let active = TimelineEngine::plan(&timeline, 0.3);
        assert_eq!(active.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_stagger_past_the_end_fails() {
        let result = TimelineBuilder::new()
            .stagger("card", 4, 0.5, 0.25, noop)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_stagger_evenly_ends_at_one() {
        let timeline = TimelineBuilder::new()
            .stagger_evenly("word", 4, 0.5, noop)
            .build()
            .unwrap();

        let (_, last_end) = timeline.range_of("word-3").unwrap();
        assert!((last_end - 1.0).abs() < 1e-9);
        let (first_start, _) = timeline.range_of("word-0").unwrap();
        assert_eq!(first_start, 0.0);
    }

    #[test]
    fn test_even_ranges_match_stagger_evenly() {
        let ranges = TimelineBuilder::even_ranges(3, 0.5);
        assert_eq!(ranges, vec![(0.0, 0.5), (0.25, 0.75), (0.5, 1.0)]);

        let timeline = TimelineBuilder::new()
            .stagger_evenly("line", 3, 0.5, noop)
            .build()
            .unwrap();
        for (i, range) in ranges.iter().enumerate() {
            assert_eq!(timeline.range_of(&format!("line-{}", i)), Some(*range));
        }

        assert!(TimelineBuilder::even_ranges(0, 0.5).is_empty());
        assert_eq!(TimelineBuilder::even_ranges(1, 0.5), vec![(0.0, 1.0)]);
    }
}
