use tracing::{debug, trace};

use crate::config::{ControllerConfig, ProgressMode};
use crate::diagnostics::{Diagnostics, DiagnosticsCallback, RuntimeWarning};
use crate::motion::timing::approx_eq;
use crate::motion::{
    DecayPlan, InertiaConfig, InertiaResolver, InputSample, ProgressMapper, SampleWindow,
    VelocityEstimate, VelocitySampler, BASELINE_RATE,
};
use crate::timeline::{EvaluationReport, Timeline, TimelineEngine};

use super::scheduler::FrameScheduler;
use super::state::{ControllerState, PlaybackState};

/// Handle returned by `on_state_change`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type StateListener = Box<dyn FnMut(ControllerState, ControllerState)>;

/// In-flight decay after input was released
#[derive(Debug, Clone, Copy)]
struct ActiveDecay {
    plan: DecayPlan,
    elapsed_ms: f64,
    /// Rate was already within epsilon of baseline on the previous tick
    settle_pending: bool,
}

/// Orchestrates input → velocity → rate/progress → timeline evaluation
///
/// Owns the timeline and all playback state. Single-threaded: input and
/// frame ticks are interleaved calls on the same `&mut self`.
///
/// Dropping the controller destroys it.
pub struct ScrubController {
    config: ControllerConfig,
    inertia: InertiaConfig,
    timeline: Timeline,
    scheduler: Box<dyn FrameScheduler>,
    state: ControllerState,
    playback: PlaybackState,
    /// Unreduced input coordinate; progress is always derived from it
    raw: f64,
    cycle: i64,
    window: SampleWindow,
    velocity: VelocityEstimate,
    /// Frame time elapsed since the last accepted sample
    since_sample_ms: f64,
    decay: Option<ActiveDecay>,
    running: bool,
    tick_requested: bool,
    listeners: Vec<(ListenerId, StateListener)>,
    next_listener: u64,
    diagnostics: Diagnostics,
    frames: u64,
}

impl std::fmt::Debug for ScrubController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrubController")
            .field("state", &self.state)
            .field("playback", &self.playback)
            .field("raw", &self.raw)
            .field("running", &self.running)
            .field("segments", &self.timeline.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl ScrubController {
    /// Create a controller in the `Idle` state
    ///
    /// Fails with a configuration error when `config` does not validate.
    /// Nothing renders until `start()`.
    pub fn new<S>(config: ControllerConfig, timeline: Timeline, scheduler: S) -> crate::Result<Self>
    where
        S: FrameScheduler + 'static,
    {
        config.validate()?;

        let raw = config.bounds.min;
        debug!(
            mode = ?config.mode,
            segments = timeline.len(),
            decay_ms = config.decay_duration_ms,
            "Scrub controller created"
        );

        Ok(Self {
            inertia: config.inertia(),
            cycle: ProgressMapper::cycle_index(raw, config.bounds),
            config,
            timeline,
            scheduler: Box::new(scheduler),
            state: ControllerState::Idle,
            playback: PlaybackState::default(),
            raw,
            window: SampleWindow::new(),
            velocity: VelocityEstimate::ZERO,
            since_sample_ms: 0.0,
            decay: None,
            running: false,
            tick_requested: false,
            listeners: Vec::new(),
            next_listener: 1,
            diagnostics: Diagnostics::new(),
            frames: 0,
        })
    }

    // ---- lifecycle ----------------------------------------------------

    /// Begin accepting input and rendering frames
    ///
    /// Always requests one frame so the current progress is drawn.
    pub fn start(&mut self) {
        if self.ignore_destroyed("start") || self.running {
            return;
        }
        self.running = true;
        debug!(state = %self.state, "Scrub controller started");
        self.request_frame();
    }

    /// Stop rendering and ignore input until the next `start()`
    ///
    /// Playback state is kept; a pending decay resumes on `start()`.
    pub fn pause(&mut self) {
        if self.ignore_destroyed("pause") || !self.running {
            return;
        }
        self.running = false;
        self.cancel_frame();
        debug!(state = %self.state, "Scrub controller paused");
    }

    /// Tear down: cancel the pending frame, drop listeners, stop rendering
    ///
    /// Idempotent; every later call on the controller is a no-op.
    pub fn destroy(&mut self) {
        if self.state.is_destroyed() {
            return;
        }
        self.cancel_frame();
        self.running = false;
        self.window.clear();
        self.decay = None;
        self.transition(ControllerState::Destroyed);
        self.listeners.clear();
        self.diagnostics.clear_callback();
        debug!(frames = self.frames, "Scrub controller destroyed");
    }

    /// Subscribe to state transitions; the callback gets `(from, to)`
    pub fn on_state_change<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(ControllerState, ControllerState) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        if self.ignore_destroyed("on_state_change") {
            return id;
        }
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Unsubscribe; returns whether the listener was registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Forward runtime warnings to the host
    pub fn set_diagnostics_callback(&mut self, callback: DiagnosticsCallback) {
        if self.ignore_destroyed("set_diagnostics_callback") {
            return;
        }
        self.diagnostics.set_callback(callback);
    }

    // ---- input adapter ------------------------------------------------

    /// Feed one raw pointer-move or scroll-update reading
    pub fn push_sample(&mut self, sample: InputSample) {
        if self.ignore_destroyed("push_sample") {
            return;
        }
        if !self.running {
            trace!("Sample ignored while paused");
            return;
        }
        if !sample.position.is_finite() || !sample.timestamp_ms.is_finite() {
            self.diagnostics.report(RuntimeWarning::NonFiniteInput {
                value: sample.position,
            });
            return;
        }

        if self.state != ControllerState::Active {
            // New gesture: forget the previous one and any decay in flight
            self.window.clear();
            self.decay = None;
            self.velocity = VelocityEstimate::ZERO;
            self.transition(ControllerState::Active);
        }

        self.since_sample_ms = 0.0;
        let previous = self.window.latest();
        if let Some(previous) = previous {
            self.move_raw((sample.position - previous.position) * self.inertia.direction());

            if VelocitySampler::is_stale(&sample, &previous) {
                self.diagnostics.report(RuntimeWarning::DuplicateTimestamp {
                    timestamp_ms: sample.timestamp_ms,
                });
                // Keep the current velocity; the position still tracks the pointer
                self.window.clear();
                self.window.push(InputSample::new(sample.position, previous.timestamp_ms));
                self.request_frame();
                return;
            }
        }

        self.window.push(sample);
        self.velocity = VelocitySampler::sample(sample, previous);
        self.playback.rate = self.resolve_rate();
        self.request_frame();
    }

    /// The drag ended or the scroll settled; start decaying toward baseline
    pub fn release_input(&mut self) {
        if self.ignore_destroyed("release_input") {
            return;
        }
        if self.state != ControllerState::Active {
            trace!(state = %self.state, "Release ignored outside an active gesture");
            return;
        }

        let resolution = InertiaResolver::resolve(self.velocity, &self.inertia);
        self.playback.rate = resolution.target_rate;
        self.decay = Some(ActiveDecay {
            plan: resolution.decay_plan,
            elapsed_ms: 0.0,
            settle_pending: false,
        });
        self.window.clear();
        debug!(
            velocity = self.velocity.value,
            rate = resolution.target_rate,
            "Input released, decaying"
        );
        self.transition(ControllerState::Decaying);
        self.request_frame();
    }

    // ---- playback -----------------------------------------------------

    /// Jump straight to `progress`, bypassing velocity and decay
    ///
    /// Renders immediately. Bounded timelines clamp, wrapping ones reduce.
    pub fn seek(&mut self, progress: f64) -> Option<EvaluationReport> {
        if self.ignore_destroyed("seek") {
            return None;
        }
        if !progress.is_finite() {
            self.diagnostics.report(RuntimeWarning::NonFiniteInput { value: progress });
            return None;
        }

        let progress = match self.config.mode {
            ProgressMode::Bounded => progress.clamp(0.0, 1.0),
            ProgressMode::Wrapping => progress,
        };
        self.raw = ProgressMapper::unmap(progress, self.config.bounds);
        self.cycle = ProgressMapper::cycle_index(self.raw, self.config.bounds);
        self.update_progress();
        Some(self.render())
    }

    /// Seek to the start of the segment labeled `label`
    pub fn seek_label(&mut self, label: &str) -> Option<EvaluationReport> {
        let (start, _) = self.timeline.range_of(label)?;
        self.seek(start)
    }

    /// Advance one frame of `delta_ms`; called by the host when a requested tick fires
    pub fn tick(&mut self, delta_ms: f64) -> Option<EvaluationReport> {
        if self.ignore_destroyed("tick") {
            return None;
        }
        self.tick_requested = false;
        if !self.running {
            return None;
        }

        let dt = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        match self.state {
            ControllerState::Active => {
                // Progress follows the input directly while it is held
                self.hold(dt);
            }
            ControllerState::Decaying => {
                self.step_decay(dt);
                self.advance(dt);
            }
            ControllerState::Idle => {
                if self.config.autoplay {
                    self.advance(dt);
                }
            }
            ControllerState::Destroyed => return None,
        }

        self.update_progress();
        let report = self.render();

        if self.needs_frames() {
            self.request_frame();
        }
        Some(report)
    }

    // ---- accessors ----------------------------------------------------

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn progress(&self) -> f64 {
        self.playback.progress
    }

    pub fn rate(&self) -> f64 {
        self.playback.rate
    }

    /// Velocity of the most recent gesture sample
    pub fn velocity(&self) -> VelocityEstimate {
        self.velocity
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_destroyed()
    }

    /// Frames rendered so far (ticks and seeks)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // ---- internals ----------------------------------------------------

    fn ignore_destroyed(&self, call: &str) -> bool {
        if self.state.is_destroyed() {
            trace!(call, "Call on destroyed controller ignored");
            true
        } else {
            false
        }
    }

    fn transition(&mut self, next: ControllerState) {
        if self.state == next {
            return;
        }
        let previous = self.state;
        self.state = next;
        debug!(from = %previous, to = %next, "Controller state changed");
        for (_, listener) in self.listeners.iter_mut() {
            listener(previous, next);
        }
    }

    fn request_frame(&mut self) {
        if self.running && !self.tick_requested {
            self.scheduler.request_tick();
            self.tick_requested = true;
        }
    }

    fn cancel_frame(&mut self) {
        if self.tick_requested {
            self.scheduler.cancel_tick();
            self.tick_requested = false;
        }
    }

    fn needs_frames(&self) -> bool {
        match self.state {
            ControllerState::Active | ControllerState::Decaying => true,
            ControllerState::Idle => self.config.autoplay,
            ControllerState::Destroyed => false,
        }
    }

    /// Rate implied by the latest velocity, reporting clamped spikes
    fn resolve_rate(&mut self) -> f64 {
        let resolution = InertiaResolver::resolve(self.velocity, &self.inertia);
        if resolution.clamped {
            self.diagnostics.report(RuntimeWarning::VelocityClamped {
                velocity: self.velocity.value,
                rate: resolution.target_rate,
            });
        }
        resolution.target_rate
    }

    /// A pointer held still stops sending samples; treat it as stopped
    fn hold(&mut self, dt: f64) {
        self.since_sample_ms += dt;
        if self.since_sample_ms < self.config.hold_timeout_ms || self.velocity.value == 0.0 {
            return;
        }
        trace!(held_ms = self.since_sample_ms, "No recent samples, velocity reset");
        self.velocity = VelocityEstimate::ZERO;
        self.playback.rate = self.resolve_rate();
    }

    fn step_decay(&mut self, dt: f64) {
        let Some(mut decay) = self.decay else {
            self.transition(ControllerState::Idle);
            return;
        };

        decay.elapsed_ms += dt;
        let rate = decay.plan.sample(decay.elapsed_ms);
        self.playback.rate = rate;

        if approx_eq(rate, BASELINE_RATE, self.config.settle_epsilon) {
            if decay.settle_pending {
                self.playback.rate = BASELINE_RATE;
                self.decay = None;
                self.transition(ControllerState::Idle);
                return;
            }
            decay.settle_pending = true;
        } else {
            decay.settle_pending = false;
        }
        self.decay = Some(decay);
    }

    /// Integrate the current rate over `dt` milliseconds
    fn advance(&mut self, dt: f64) {
        let span = self.config.bounds.span();
        self.move_raw(self.playback.rate * dt / self.config.duration_ms * span);
    }

    fn move_raw(&mut self, delta: f64) {
        self.raw += delta;
        if self.config.mode == ProgressMode::Bounded {
            self.raw = self.raw.clamp(self.config.bounds.min, self.config.bounds.max);
        }
    }

    fn update_progress(&mut self) {
        let mapped = ProgressMapper::map(self.raw, self.config.mode, self.config.bounds);
        if let Some(warning) = mapped.warning {
            self.diagnostics.report(warning);
        }
        self.playback.progress = mapped.value;

        let cycle = match self.config.mode {
            ProgressMode::Bounded => 0,
            ProgressMode::Wrapping => ProgressMapper::cycle_index(self.raw, self.config.bounds),
        };
        self.playback.wrapped = cycle != self.cycle;
        self.cycle = cycle;
    }

    fn render(&mut self) -> EvaluationReport {
        let report = TimelineEngine::evaluate(&mut self.timeline, self.playback.progress);
        for failure in &report.failures {
            self.diagnostics.report(RuntimeWarning::SegmentFailed {
                label: failure.label.clone(),
                message: failure.error.to_string(),
            });
        }
        self.frames += 1;
        report
    }
}

impl Drop for ScrubController {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, EasingType};
    use crate::controller::ManualScheduler;
    use crate::diagnostics::WarningKind;
    use crate::timeline::Segment;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME_MS: f64 = 16.0;

    type Calls = Rc<RefCell<Vec<(&'static str, f64)>>>;

    fn recording_timeline(calls: &Calls) -> Timeline {
        let a = Rc::clone(calls);
        let b = Rc::clone(calls);
        Timeline::builder()
            .segment("first", 0.0, 0.6, move |t| {
                a.borrow_mut().push(("first", t));
                Ok(())
            })
            .segment("second", 0.4, 1.0, move |t| {
                b.borrow_mut().push(("second", t));
                Ok(())
            })
            .build()
            .unwrap()
    }

    fn fling_config() -> ControllerConfig {
        ControllerConfig {
            mode: ProgressMode::Wrapping,
            bounds: Bounds::new(0.0, 1000.0),
            max_rate: 5.0,
            min_rate: -5.0,
            velocity_to_rate_scale: 10.0,
            decay_duration_ms: 480.0,
            invert_direction: true,
            duration_ms: 2000.0,
            decay_easing: EasingType::Cubic,
            ..Default::default()
        }
    }

    fn controller(config: ControllerConfig) -> (ScrubController, ManualScheduler, Calls) {
        let calls: Calls = Rc::default();
        let scheduler = ManualScheduler::new();
        let controller =
            ScrubController::new(config, recording_timeline(&calls), scheduler.clone()).unwrap();
        (controller, scheduler, calls)
    }

    /// Deliver pending ticks until the controller stops asking, up to `limit`
    fn run_frames(controller: &mut ScrubController, scheduler: &ManualScheduler, limit: usize) -> usize {
        let mut frames = 0;
        while frames < limit && scheduler.take_pending() {
            controller.tick(FRAME_MS);
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_invalid_config_refuses_construction() {
        let config = ControllerConfig {
            bounds: Bounds::new(5.0, 5.0),
            ..Default::default()
        };
        let calls: Calls = Rc::default();
        let result = ScrubController::new(config, recording_timeline(&calls), ManualScheduler::new());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_start_renders_one_frame_then_idles() {
        let (mut controller, scheduler, calls) = controller(fling_config());
        assert!(!scheduler.is_pending());

        controller.start();
        assert!(scheduler.is_pending());
        assert_eq!(run_frames(&mut controller, &scheduler, 10), 1);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(calls.borrow().as_slice(), &[("first", 0.0)]);
    }

    #[test]
    fn test_samples_ignored_before_start() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.push_sample(InputSample::new(10.0, 0.0));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_drag_and_release_fling() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        run_frames(&mut controller, &scheduler, 1);

        // Fast leftward drag: -20 units every 16ms
        for i in 0..10 {
            controller.push_sample(InputSample::new(500.0 - 20.0 * i as f64, FRAME_MS * i as f64));
            assert_eq!(controller.state(), ControllerState::Active);
            run_frames(&mut controller, &scheduler, 1);
        }
        assert_eq!(controller.rate(), 5.0);
        assert!(controller.diagnostics().count(WarningKind::VelocityClamped) > 0);

        controller.release_input();
        assert_eq!(controller.state(), ControllerState::Decaying);
        assert_eq!(controller.rate(), 5.0);

        let mut rates = Vec::new();
        while scheduler.take_pending() {
            controller.tick(FRAME_MS);
            rates.push(controller.rate());
            assert!(rates.len() < 1000, "decay never settled");
        }

        for pair in rates.windows(2) {
            assert!(pair[1] <= pair[0], "rate rose from {} to {}", pair[0], pair[1]);
        }
        assert!(rates.iter().all(|r| *r >= 1.0 && *r <= 5.0));
        assert_eq!(controller.rate(), 1.0);
        assert_eq!(controller.state(), ControllerState::Idle);

        let decay_frames = (480.0 / FRAME_MS) as usize;
        assert!(rates.len() <= decay_frames + 1, "took {} frames", rates.len());
    }

    #[test]
    fn test_hold_before_release_does_not_fling() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        run_frames(&mut controller, &scheduler, 1);

        for i in 0..10 {
            controller.push_sample(InputSample::new(500.0 - 20.0 * i as f64, FRAME_MS * i as f64));
            run_frames(&mut controller, &scheduler, 1);
        }
        assert_eq!(controller.rate(), 5.0);

        // Pointer stays down without moving for two seconds
        assert_eq!(run_frames(&mut controller, &scheduler, 125), 125);
        assert_eq!(controller.state(), ControllerState::Active);
        assert_eq!(controller.velocity(), VelocityEstimate::ZERO);
        assert_eq!(controller.rate(), 0.0);

        controller.release_input();
        assert_eq!(controller.state(), ControllerState::Decaying);
        assert_eq!(controller.rate(), 0.0);

        while scheduler.take_pending() {
            controller.tick(FRAME_MS);
            let rate = controller.rate();
            assert!((0.0..=1.0).contains(&rate), "rate {}", rate);
        }
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn test_short_pause_keeps_drag_rate() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        for i in 0..4 {
            controller.push_sample(InputSample::new(500.0 - 20.0 * i as f64, FRAME_MS * i as f64));
            run_frames(&mut controller, &scheduler, 1);
        }
        // Three frames apart is still well inside the hold timeout
        run_frames(&mut controller, &scheduler, 2);
        assert_eq!(controller.rate(), 5.0);

        controller.release_input();
        assert_eq!(controller.rate(), 5.0);
    }

    #[test]
    fn test_zero_velocity_decays_to_baseline() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        for i in 0..4 {
            controller.push_sample(InputSample::new(300.0, FRAME_MS * i as f64));
        }
        assert_eq!(controller.rate(), 0.0);
        controller.release_input();

        let limit = (480.0 / FRAME_MS) as usize + 5;
        run_frames(&mut controller, &scheduler, limit);
        assert!((controller.rate() - 1.0).abs() < 1e-3);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_drag_moves_progress_with_direction() {
        let config = ControllerConfig {
            invert_direction: false,
            ..fling_config()
        };
        let (mut controller, scheduler, _) = controller(config);
        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        controller.push_sample(InputSample::new(250.0, 16.0));
        run_frames(&mut controller, &scheduler, 1);
        assert!((controller.progress() - 0.25).abs() < 1e-9);

        // Dragging back past the origin wraps
        controller.push_sample(InputSample::new(-100.0, 32.0));
        run_frames(&mut controller, &scheduler, 1);
        assert!((controller.progress() - 0.9).abs() < 1e-9);
        assert!(controller.playback().wrapped);
    }

    #[test]
    fn test_bounded_progress_clamps() {
        let config = ControllerConfig {
            mode: ProgressMode::Bounded,
            invert_direction: false,
            ..fling_config()
        };
        let (mut controller, scheduler, _) = controller(config);
        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        controller.push_sample(InputSample::new(5000.0, 16.0));
        run_frames(&mut controller, &scheduler, 1);
        assert_eq!(controller.progress(), 1.0);

        // Coming back responds immediately, no dead zone past the end
        controller.push_sample(InputSample::new(4500.0, 32.0));
        run_frames(&mut controller, &scheduler, 1);
        assert!((controller.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_wrapping_progress_stays_in_range_during_decay() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        for i in 0..6 {
            controller.push_sample(InputSample::new(-300.0 * i as f64, FRAME_MS * i as f64));
        }
        controller.release_input();
        while scheduler.take_pending() {
            controller.tick(FRAME_MS);
            let p = controller.progress();
            assert!((0.0..1.0).contains(&p), "progress {}", p);
        }
    }

    #[test]
    fn test_duplicate_timestamp_warns_and_keeps_rate() {
        let (mut controller, _, _) = controller(fling_config());
        controller.start();
        controller.push_sample(InputSample::new(100.0, 0.0));
        controller.push_sample(InputSample::new(90.0, 16.0));
        let rate = controller.rate();
        controller.push_sample(InputSample::new(80.0, 16.0));

        assert_eq!(controller.rate(), rate);
        assert_eq!(controller.diagnostics().count(WarningKind::DuplicateTimestamp), 1);
    }

    #[test]
    fn test_seek_bypasses_decay() {
        let (mut controller, scheduler, calls) = controller(fling_config());
        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        controller.push_sample(InputSample::new(-40.0, 16.0));
        controller.release_input();
        let rate = controller.rate();

        calls.borrow_mut().clear();
        let report = controller.seek(0.5).unwrap();
        assert_eq!(report.calls.len(), 2);
        assert_eq!(controller.state(), ControllerState::Decaying);
        assert_eq!(controller.rate(), rate);
        assert!((controller.progress() - 0.5).abs() < 1e-9);
        assert!(scheduler.is_pending());

        let calls = calls.borrow();
        assert_eq!(calls[0].0, "first");
        assert!((calls[0].1 - 0.8333).abs() < 1e-3);
        assert_eq!(calls[1].0, "second");
        assert!((calls[1].1 - 0.1667).abs() < 1e-3);
    }

    #[test]
    fn test_seek_is_deterministic() {
        let (mut controller, _, calls) = controller(fling_config());
        controller.seek(0.45);
        let first: Vec<_> = calls.borrow_mut().drain(..).collect();
        controller.seek(0.45);
        let second: Vec<_> = calls.borrow_mut().drain(..).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_seek_label_and_wrapping_reduction() {
        let (mut controller, _, _) = controller(fling_config());
        controller.seek_label("second");
        assert!((controller.progress() - 0.4).abs() < 1e-9);
        assert!(controller.seek_label("missing").is_none());

        controller.seek(2.25);
        assert!((controller.progress() - 0.25).abs() < 1e-9);
        controller.seek(-0.25);
        assert!((controller.progress() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        assert!(scheduler.is_pending());

        controller.pause();
        assert!(!scheduler.is_pending());
        assert!(controller.tick(FRAME_MS).is_none());

        controller.start();
        assert!(scheduler.is_pending());
    }

    #[test]
    fn test_autoplay_advances_while_idle() {
        let config = ControllerConfig {
            autoplay: true,
            ..fling_config()
        };
        let (mut controller, scheduler, _) = controller(config);
        controller.start();
        // 2000ms per pass at rate 1.0: 125 frames of 16ms
        run_frames(&mut controller, &scheduler, 125);
        assert!(controller.progress() < 1e-9 || controller.progress() > 1.0 - 1e-9);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(scheduler.is_pending());
    }

    #[test]
    fn test_state_listeners_see_transitions() {
        let (mut controller, scheduler, _) = controller(fling_config());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = controller.on_state_change(move |from, to| sink.borrow_mut().push((from, to)));

        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        controller.release_input();
        run_frames(&mut controller, &scheduler, 100);

        assert_eq!(
            seen.borrow().as_slice(),
            &[
                (ControllerState::Idle, ControllerState::Active),
                (ControllerState::Active, ControllerState::Decaying),
                (ControllerState::Decaying, ControllerState::Idle),
            ]
        );

        assert!(controller.remove_listener(id));
        assert!(!controller.remove_listener(id));
    }

    #[test]
    fn test_destroy_during_active_stops_rendering() {
        let (mut controller, scheduler, calls) = controller(fling_config());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.on_state_change(move |_, to| sink.borrow_mut().push(to));

        controller.start();
        controller.push_sample(InputSample::new(0.0, 0.0));
        controller.push_sample(InputSample::new(-20.0, 16.0));
        run_frames(&mut controller, &scheduler, 1);
        assert_eq!(controller.state(), ControllerState::Active);

        controller.destroy();
        assert!(!scheduler.is_pending());
        let rendered = calls.borrow().len();

        // Queued events arriving after teardown
        controller.push_sample(InputSample::new(-40.0, 32.0));
        controller.release_input();
        assert!(controller.tick(FRAME_MS).is_none());
        assert!(controller.seek(0.5).is_none());
        controller.start();
        controller.destroy();

        assert_eq!(calls.borrow().len(), rendered);
        assert_eq!(controller.state(), ControllerState::Destroyed);
        assert!(!scheduler.is_pending());
        assert_eq!(seen.borrow().last(), Some(&ControllerState::Destroyed));
        assert_eq!(seen.borrow().iter().filter(|s| s.is_destroyed()).count(), 1);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let (mut controller, scheduler, _) = controller(fling_config());
        controller.start();
        assert!(scheduler.is_pending());
        drop(controller);
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.cancels(), 1);
    }

    #[test]
    fn test_failing_segment_reported_as_warning() {
        let scheduler = ManualScheduler::new();
        let rendered = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&rendered);
        let timeline = Timeline::new(vec![
            Segment::new("broken", 0.0, 1.0, |_| Err(crate::Error::render("detached"))).unwrap(),
            Segment::new("ok", 0.0, 1.0, move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            })
            .unwrap(),
        ])
        .unwrap();

        let warnings = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&warnings);
        let mut controller =
            ScrubController::new(fling_config(), timeline, scheduler.clone()).unwrap();
        controller.set_diagnostics_callback(Box::new(move |w| sink.borrow_mut().push(w.clone())));
        controller.start();
        run_frames(&mut controller, &scheduler, 1);

        assert_eq!(*rendered.borrow(), 1);
        assert_eq!(controller.diagnostics().count(WarningKind::SegmentFailed), 1);
        assert!(matches!(
            warnings.borrow().first(),
            Some(RuntimeWarning::SegmentFailed { label, .. }) if label == "broken"
        ));
    }
}
