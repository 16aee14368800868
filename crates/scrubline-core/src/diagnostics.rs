//! Non-fatal runtime warnings
//!
//! Nothing in here ever interrupts a frame. Warnings are logged, counted,
//! and forwarded to an optional host callback so demos can surface them.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeWarning {
    #[error("bounds [{min}, {max}] have zero span, progress forced to 0")]
    DegenerateBounds { min: f64, max: f64 },

    #[error("non-finite input {value} ignored, progress forced to 0")]
    NonFiniteInput { value: f64 },

    #[error("velocity {velocity} clamped to rate {rate}")]
    VelocityClamped { velocity: f64, rate: f64 },

    #[error("sample at {timestamp_ms}ms does not advance time, velocity treated as 0")]
    DuplicateTimestamp { timestamp_ms: f64 },

    #[error("segment '{label}' failed to render: {message}")]
    SegmentFailed { label: String, message: String },
}

/// Warning category, used as the counter key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    DegenerateBounds,
    NonFiniteInput,
    VelocityClamped,
    DuplicateTimestamp,
    SegmentFailed,
}

impl RuntimeWarning {
    pub fn kind(&self) -> WarningKind {
        match self {
            RuntimeWarning::DegenerateBounds { .. } => WarningKind::DegenerateBounds,
            RuntimeWarning::NonFiniteInput { .. } => WarningKind::NonFiniteInput,
            RuntimeWarning::VelocityClamped { .. } => WarningKind::VelocityClamped,
            RuntimeWarning::DuplicateTimestamp { .. } => WarningKind::DuplicateTimestamp,
            RuntimeWarning::SegmentFailed { .. } => WarningKind::SegmentFailed,
        }
    }
}

pub type DiagnosticsCallback = Box<dyn FnMut(&RuntimeWarning)>;

/// Running tally of warnings raised by one controller
#[derive(Default)]
pub struct Diagnostics {
    counts: HashMap<WarningKind, u64>,
    last: Option<RuntimeWarning>,
    callback: Option<DiagnosticsCallback>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("counts", &self.counts)
            .field("last", &self.last)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every future warning to `callback`
    pub fn set_callback(&mut self, callback: DiagnosticsCallback) {
        self.callback = Some(callback);
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn report(&mut self, warning: RuntimeWarning) {
        warn!(kind = ?warning.kind(), "{}", warning);
        *self.counts.entry(warning.kind()).or_insert(0) += 1;
        if let Some(ref mut callback) = self.callback {
            callback(&warning);
        }
        self.last = Some(warning);
    }

    pub fn count(&self, kind: WarningKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn last(&self) -> Option<&RuntimeWarning> {
        self.last.as_ref()
    }
}
