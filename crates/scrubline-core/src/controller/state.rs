use std::fmt;

use serde::Serialize;

/// Lifecycle of a scrub controller
///
/// `Idle -> Active -> Decaying -> Idle`, with `Destroyed` reachable from
/// anywhere and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    /// No input and no decay in flight
    Idle,
    /// Input samples are arriving
    Active,
    /// Input released; rate easing back to baseline
    Decaying,
    /// Torn down; every call is a no-op
    Destroyed,
}

impl ControllerState {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, ControllerState::Destroyed)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Idle => "idle",
            ControllerState::Active => "active",
            ControllerState::Decaying => "decaying",
            ControllerState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Snapshot of where the timeline is and how fast it moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Normalized progress; [0, 1) when wrapping, [0, 1] when bounded
    pub progress: f64,
    /// Time-scale multiplier, 1.0 = baseline, negative = reverse
    pub rate: f64,
    /// The last update crossed a cycle boundary
    pub wrapped: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            rate: crate::motion::BASELINE_RATE,
            wrapped: false,
        }
    }
}
