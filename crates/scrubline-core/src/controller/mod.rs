//! Scrub controller: wires input, inertia, progress and timeline together
//!
//! # Architecture
//!
//! - `scheduler` - Frame scheduling capability injected by the host
//! - `state` - Lifecycle states and the playback snapshot
//! - `scrub` - The orchestrator owning all mutable state
//!
//! # Usage
//!
//! ```ignore
//! use scrubline_core::{ControllerConfig, ManualScheduler, ScrubController, Timeline};
//!
//! let scheduler = ManualScheduler::new();
//! let timeline = Timeline::builder()
//!     .segment("slide", 0.0, 1.0, |t| { println!("{t}"); Ok(()) })
//!     .build()?;
//! let mut controller = ScrubController::new(ControllerConfig::default(), timeline, scheduler.clone())?;
//! controller.start();
//!
//! // Input adapter
//! controller.push_sample(InputSample::new(x, now_ms));
//! controller.release_input();
//!
//! // Frame loop
//! while scheduler.take_pending() {
//!     controller.tick(16.0);
//! }
//! ```

pub mod scheduler;
pub mod scrub;
pub mod state;

pub use scheduler::{FrameScheduler, ManualScheduler};
pub use scrub::{ListenerId, ScrubController};
pub use state::{ControllerState, PlaybackState};
