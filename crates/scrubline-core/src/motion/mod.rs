//! Pure motion math for scrub-driven timelines
//!
//! Everything in this module is a function over explicit values: no clocks,
//! no callbacks, no shared state. The controller owns all mutation.
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - Easing curves and the read-only easing registry
//! - `timing` - Interpolation and elapsed-fraction helpers
//!
//! ## Input pipeline
//! - `velocity` - Raw samples to signed velocity (units per millisecond)
//! - `inertia` - Velocity to target playback rate plus a decay plan
//! - `progress` - Raw input coordinate to normalized timeline progress

pub mod easing;
pub mod inertia;
pub mod progress;
pub mod timing;
pub mod velocity;

pub use easing::EasingRegistry;
pub use inertia::{DecayPlan, InertiaConfig, InertiaResolver, Resolution, BASELINE_RATE};
pub use progress::{MappedProgress, ProgressMapper};
pub use velocity::{InputSample, SampleWindow, VelocityEstimate, VelocitySampler};
