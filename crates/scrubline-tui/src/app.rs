use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use scrubline_core::{
    AppConfig, Bounds, ControllerConfig, ControllerState, InputSample, ManualScheduler,
    PlaybackState, ProgressMode, ScrubController, Timeline, TimelineBuilder,
};

use crate::input::Action;
use crate::stage::{MarqueeStage, RevealStage, SharedStage};
use crate::theme::Theme;

/// Raw input columns covering the whole reveal timeline
pub const REVEAL_SPAN: f64 = 48.0;
/// Virtual columns moved per mouse wheel notch
pub const WHEEL_STEP: f64 = 3.0;
/// Quiet time after the last wheel notch before the scroll counts as settled
pub const WHEEL_SETTLE_MS: f64 = 60.0;

/// Which demo receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Marquee,
    Reveal,
}

impl Focus {
    pub fn title(&self) -> &'static str {
        match self {
            Focus::Marquee => "Marquee",
            Focus::Reveal => "Reveal",
        }
    }

    fn other(&self) -> Self {
        match self {
            Focus::Marquee => Focus::Reveal,
            Focus::Reveal => Focus::Marquee,
        }
    }
}

/// One controller plus the frame scheduler the host drains
pub struct Demo {
    controller: ScrubController,
    scheduler: ManualScheduler,
}

impl Demo {
    fn new(config: ControllerConfig, timeline: Timeline, warnings: &SharedStage<Option<String>>) -> Result<Self> {
        let scheduler = ManualScheduler::new();
        let mut controller = ScrubController::new(config, timeline, scheduler.clone())?;
        let sink = Rc::clone(warnings);
        controller.set_diagnostics_callback(Box::new(move |warning| {
            *sink.borrow_mut() = Some(warning.to_string());
        }));
        Ok(Self {
            controller,
            scheduler,
        })
    }

    /// Run the requested frame, if any; returns whether one ran
    fn deliver(&mut self, delta_ms: f64) -> bool {
        if self.scheduler.take_pending() {
            self.controller.tick(delta_ms);
            true
        } else {
            false
        }
    }

    pub fn controller(&self) -> &ScrubController {
        &self.controller
    }

    pub fn playback(&self) -> PlaybackState {
        self.controller.playback()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending()
    }
}

/// Wheel notches arrive without a release; this tracks the virtual pointer
#[derive(Debug, Clone, Copy)]
struct WheelGesture {
    position: f64,
    last_ms: f64,
}

/// Application state
pub struct App {
    pub focus: Focus,
    pub marquee: Demo,
    pub reveal: Demo,
    pub marquee_stage: SharedStage<MarqueeStage>,
    pub reveal_stage: SharedStage<RevealStage>,
    pub marquee_text: String,
    pub reveal_lines: Vec<String>,
    pub theme: Theme,
    pub should_quit: bool,
    /// Most recent runtime warning from either controller
    pub status_message: Option<String>,
    warnings: SharedStage<Option<String>>,
    wheel: Option<WheelGesture>,
    started: Instant,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let warnings: SharedStage<Option<String>> = Rc::default();

        let mut marquee_text = config.demo.marquee_text.clone();
        if marquee_text.trim().is_empty() {
            marquee_text = " * ".to_string();
        }
        let reveal_lines = if config.demo.reveal_lines.is_empty() {
            scrubline_core::DemoConfig::default().reveal_lines
        } else {
            config.demo.reveal_lines.clone()
        };

        let marquee_stage: SharedStage<MarqueeStage> = Rc::default();
        let marquee = Demo::new(
            marquee_config(&config.controller, marquee_text.chars().count()),
            marquee_timeline(&marquee_stage)?,
            &warnings,
        )?;

        let reveal_stage = Rc::new(RefCell::new(RevealStage::new(reveal_lines.len())));
        let reveal = Demo::new(
            reveal_config(&config.controller),
            reveal_timeline(&reveal_stage, reveal_lines.len())?,
            &warnings,
        )?;

        let mut app = Self {
            focus: Focus::Marquee,
            marquee,
            reveal,
            marquee_stage,
            reveal_stage,
            marquee_text,
            reveal_lines,
            theme: Theme::default(),
            should_quit: false,
            status_message: None,
            warnings,
            wheel: None,
            started: Instant::now(),
        };
        app.demo_mut(app.focus).controller.start();
        info!(
            marquee_chars = app.marquee_text.chars().count(),
            reveal_lines = app.reveal_lines.len(),
            "Demo host ready"
        );
        Ok(app)
    }

    pub fn demo(&self, focus: Focus) -> &Demo {
        match focus {
            Focus::Marquee => &self.marquee,
            Focus::Reveal => &self.reveal,
        }
    }

    fn demo_mut(&mut self, focus: Focus) -> &mut Demo {
        match focus {
            Focus::Marquee => &mut self.marquee,
            Focus::Reveal => &mut self.reveal,
        }
    }

    pub fn focused(&self) -> &Demo {
        self.demo(self.focus)
    }

    /// Milliseconds since the app started, used to timestamp input
    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Perform one input action
    pub fn apply(&mut self, action: Action) {
        let now = self.now_ms();
        match action {
            Action::Quit => self.should_quit = true,
            Action::SwitchDemo => self.switch_demo(),
            Action::TogglePause => self.toggle_pause(),
            Action::Nudge(delta) => {
                let target = self.focused().playback().progress + delta;
                self.seek(target);
            }
            Action::SeekStart => self.seek(0.0),
            Action::SeekEnd => self.seek(1.0),
            Action::Drag(position) => self.pointer_move(position, now),
            Action::Release => self.pointer_release(),
            Action::Wheel(delta) => self.wheel(delta, now),
            Action::None => {}
        }
    }

    /// Feed a pointer-move reading to the focused controller
    pub fn pointer_move(&mut self, position: f64, timestamp_ms: f64) {
        self.wheel = None;
        let focus = self.focus;
        self.demo_mut(focus)
            .controller
            .push_sample(InputSample::new(position, timestamp_ms));
        self.sync();
    }

    pub fn pointer_release(&mut self) {
        let focus = self.focus;
        self.demo_mut(focus).controller.release_input();
        self.sync();
    }

    /// One wheel notch; the scroll is released once notches stop arriving
    pub fn wheel(&mut self, delta: f64, timestamp_ms: f64) {
        let mut gesture = self.wheel.unwrap_or(WheelGesture {
            position: 0.0,
            last_ms: timestamp_ms,
        });
        gesture.position += delta;
        gesture.last_ms = timestamp_ms;

        let focus = self.focus;
        self.demo_mut(focus)
            .controller
            .push_sample(InputSample::new(gesture.position, timestamp_ms));
        self.wheel = Some(gesture);
        self.sync();
    }

    pub fn seek(&mut self, progress: f64) {
        let focus = self.focus;
        self.demo_mut(focus).controller.seek(progress);
        self.sync();
    }

    /// Advance every demo that asked for a frame
    pub fn on_tick(&mut self, delta_ms: f64, now_ms: f64) {
        if let Some(gesture) = self.wheel {
            if now_ms - gesture.last_ms >= WHEEL_SETTLE_MS {
                self.wheel = None;
                self.pointer_release();
            }
        }

        self.marquee.deliver(delta_ms);
        self.reveal.deliver(delta_ms);
        self.sync();
    }

    /// Whether any demo wants another frame soon
    pub fn is_animating(&self) -> bool {
        self.marquee.has_pending_frame() || self.reveal.has_pending_frame() || self.wheel.is_some()
    }

    fn switch_demo(&mut self) {
        let from = self.focus;
        let to = from.other();
        if self.wheel.take().is_some() {
            self.demo_mut(from).controller.release_input();
        }
        self.demo_mut(from).controller.pause();
        self.demo_mut(to).controller.start();
        self.focus = to;
        debug!(from = from.title(), to = to.title(), "Switched demo");
    }

    fn toggle_pause(&mut self) {
        let focus = self.focus;
        let controller = &mut self.demo_mut(focus).controller;
        if controller.is_running() {
            controller.pause();
        } else {
            controller.start();
        }
    }

    /// Surface the latest controller warning in the status bar
    fn sync(&mut self) {
        if let Some(message) = self.warnings.borrow_mut().take() {
            self.status_message = Some(message);
        }
    }
}

fn marquee_config(base: &ControllerConfig, chars: usize) -> ControllerConfig {
    ControllerConfig {
        mode: ProgressMode::Wrapping,
        bounds: Bounds::new(0.0, chars.max(1) as f64),
        // Dragging left pulls the text along with the pointer
        invert_direction: true,
        autoplay: true,
        ..base.clone()
    }
}

fn reveal_config(base: &ControllerConfig) -> ControllerConfig {
    ControllerConfig {
        mode: ProgressMode::Bounded,
        bounds: Bounds::new(0.0, REVEAL_SPAN),
        invert_direction: false,
        ..base.clone()
    }
}

fn marquee_timeline(stage: &SharedStage<MarqueeStage>) -> Result<Timeline> {
    let stage = Rc::clone(stage);
    let timeline = Timeline::builder()
        .segment("scroll", 0.0, 1.0, move |t| {
            stage.borrow_mut().offset = t;
            Ok(())
        })
        .build()?;
    Ok(timeline)
}

/// One full-length segment per line, so every frame writes every line
///
/// Each line fades in over its staggered range and stays hidden before it
/// and shown after it, in both scrub directions.
fn reveal_timeline(stage: &SharedStage<RevealStage>, lines: usize) -> Result<Timeline> {
    let mut builder = Timeline::builder();
    for (index, range) in TimelineBuilder::even_ranges(lines, 0.5).into_iter().enumerate() {
        let stage = Rc::clone(stage);
        builder = builder.segment(format!("line-{}", index), 0.0, 1.0, move |t| {
            stage.borrow_mut().set(index, reveal_amount(t, range))
        });
    }
    Ok(builder.build()?)
}

/// How much of a line is shown at timeline progress `t`
fn reveal_amount(t: f64, (start, end): (f64, f64)) -> f64 {
    if t <= start {
        0.0
    } else if t >= end {
        1.0
    } else {
        (t - start) / (end - start)
    }
}
