//! Labeled segments laid out over normalized progress
//!
//! A `Timeline` is built once and then only evaluated. Each segment owns a
//! sub-range of [0, 1] and a render callback receiving its local progress.

mod builder;
mod engine;
mod segment;

pub use builder::TimelineBuilder;
pub use engine::{EvaluationReport, SegmentCall, SegmentFailure, TimelineEngine};
pub use segment::{ApplyFn, Segment};

/// Ordered, non-empty sequence of segments spanning normalized time
#[derive(Debug)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    /// Build a timeline from already validated segments
    ///
    /// Fails when `segments` is empty.
    pub fn new(segments: Vec<Segment>) -> crate::Result<Self> {
        if segments.is_empty() {
            return Err(crate::Error::Config(
                "timeline must contain at least one segment".to_string(),
            ));
        }
        Ok(Self { segments })
    }

    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(Segment::label)
    }

    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(Segment::label)
    }

    /// `(start, end)` of the first segment carrying `label`
    pub fn range_of(&self, label: &str) -> Option<(f64, f64)> {
        self.segments
            .iter()
            .find(|s| s.label() == label)
            .map(|s| (s.start_fraction(), s.end_fraction()))
    }
}
