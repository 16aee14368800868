pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod motion;
pub mod timeline;

pub use config::{AppConfig, Bounds, ControllerConfig, DemoConfig, EasingType, ProgressMode};
pub use controller::{
    ControllerState, FrameScheduler, ListenerId, ManualScheduler, PlaybackState, ScrubController,
};
pub use diagnostics::{Diagnostics, RuntimeWarning, WarningKind};
pub use error::{Error, Result};
pub use motion::{
    DecayPlan, EasingRegistry, InertiaConfig, InertiaResolver, InputSample, MappedProgress,
    ProgressMapper, VelocityEstimate, VelocitySampler,
};
pub use timeline::{EvaluationReport, Segment, Timeline, TimelineBuilder, TimelineEngine};
