use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use super::Timeline;

/// One `apply` invocation: which segment, with what local progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCall {
    pub index: usize,
    pub local_t: f64,
}

/// A segment whose render callback failed during evaluation
#[derive(Debug)]
pub struct SegmentFailure {
    pub index: usize,
    pub label: String,
    pub error: crate::Error,
}

/// What one evaluation did
#[derive(Debug, Default)]
pub struct EvaluationReport {
    /// Progress actually evaluated, after clamping
    pub progress: f64,
    /// Every invocation in timeline order, including ones that failed
    pub calls: Vec<SegmentCall>,
    pub failures: Vec<SegmentFailure>,
}

impl EvaluationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct TimelineEngine;

impl TimelineEngine {
    /// Segments that would render at `progress`, without invoking anything
    pub fn plan(timeline: &Timeline, progress: f64) -> Vec<SegmentCall> {
        let progress = normalize(progress);
        timeline
            .segments()
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_active(progress))
            .map(|(index, segment)| SegmentCall {
                index,
                local_t: segment.local_t(progress),
            })
            .collect()
    }

    /// Render every segment active at `progress`
    ///
    /// A failing or panicking segment is recorded in the report and the
    /// remaining segments still render.
    pub fn evaluate(timeline: &mut Timeline, progress: f64) -> EvaluationReport {
        let progress = normalize(progress);
        let calls = Self::plan(timeline, progress);
        let mut failures = Vec::new();

        let segments = timeline.segments_mut();
        for call in &calls {
            let segment = &mut segments[call.index];
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| segment.invoke(call.local_t)));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(payload) => crate::Error::Render(panic_message(payload.as_ref())),
            };
            debug!(segment = segment.label(), error = %error, "Segment render failed");
            failures.push(SegmentFailure {
                index: call.index,
                label: segment.label().to_string(),
                error,
            });
        }

        EvaluationReport {
            progress,
            calls,
            failures,
        }
    }
}

/// Clamp global progress into [0, 1]; NaN counts as the start
#[inline]
fn normalize(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
