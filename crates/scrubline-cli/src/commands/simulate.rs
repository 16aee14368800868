use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use scrubline_core::{
    AppConfig, ControllerConfig, ControllerState, EasingRegistry, InputSample, ManualScheduler,
    ProgressMode, ScrubController, Timeline,
};

/// Simulated frame interval (~60fps)
pub const FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Fast drag on a wrapping timeline, then release
    Fling,
    /// Short burst of scroll updates on a bounded timeline
    Scroll,
    /// No input; baseline playback only
    Idle,
}

/// What the host feeds in before a given frame
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    Sample(f64),
    Release,
}

/// One rendered frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: f64,
    pub state: ControllerState,
    pub progress: f64,
    pub rate: f64,
    pub wrapped: bool,
    /// Labels of segments rendered this frame
    pub segments: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Trace {
    pub scenario: Scenario,
    pub frames: Vec<FrameRecord>,
    /// First frame at which the controller was idle again after input
    pub settled_at: Option<u64>,
    pub warnings: u64,
}

/// A controller driven by a scripted gesture and a manual frame clock
pub struct Simulation {
    scenario: Scenario,
    controller: ScrubController,
    scheduler: ManualScheduler,
    script: Vec<(u64, Cue)>,
    cursor: usize,
    frame: u64,
    clock_ms: f64,
    saw_input: bool,
    settled_at: Option<u64>,
    records: Vec<FrameRecord>,
}

impl Simulation {
    pub fn new(base: &ControllerConfig, scenario: Scenario) -> Result<Self> {
        let config = scenario_config(base, scenario);
        let scheduler = ManualScheduler::new();
        let mut controller = ScrubController::new(config, demo_timeline()?, scheduler.clone())?;
        controller.start();

        Ok(Self {
            scenario,
            controller,
            scheduler,
            script: script(scenario),
            cursor: 0,
            frame: 0,
            clock_ms: 0.0,
            saw_input: false,
            settled_at: None,
            records: Vec::new(),
        })
    }

    /// Play cues due this frame, then run the frame if one was requested
    ///
    /// Returns false once there is nothing left to do.
    pub fn step(&mut self) -> bool {
        while let Some(&(at, cue)) = self.script.get(self.cursor) {
            if at > self.frame {
                break;
            }
            match cue {
                Cue::Sample(position) => {
                    self.controller
                        .push_sample(InputSample::new(position, self.clock_ms));
                }
                Cue::Release => self.controller.release_input(),
            }
            self.saw_input = true;
            self.cursor += 1;
        }

        let pending = self.scheduler.take_pending();
        if pending {
            if let Some(report) = self.controller.tick(FRAME_MS) {
                let timeline = self.controller.timeline();
                let segments = report
                    .calls
                    .iter()
                    .filter_map(|call| timeline.label_of(call.index))
                    .map(str::to_string)
                    .collect();
                let playback = self.controller.playback();
                self.records.push(FrameRecord {
                    frame: self.frame,
                    time_ms: self.clock_ms,
                    state: self.controller.state(),
                    progress: playback.progress,
                    rate: playback.rate,
                    wrapped: playback.wrapped,
                    segments,
                });
            }
        }

        if self.saw_input
            && self.settled_at.is_none()
            && self.cursor == self.script.len()
            && self.controller.state() == ControllerState::Idle
        {
            self.settled_at = Some(self.frame);
        }

        self.frame += 1;
        self.clock_ms += FRAME_MS;
        pending || self.cursor < self.script.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn finish(mut self) -> Trace {
        self.controller.destroy();
        Trace {
            scenario: self.scenario,
            settled_at: self.settled_at,
            warnings: self.controller.diagnostics().total(),
            frames: std::mem::take(&mut self.records),
        }
    }
}

/// Run up to `ticks` frames without waiting between them
pub fn trace(base: &ControllerConfig, scenario: Scenario, ticks: u64) -> Result<Trace> {
    let mut simulation = Simulation::new(base, scenario)?;
    while simulation.frame() < ticks && simulation.step() {}
    Ok(simulation.finish())
}

pub async fn run(
    config: &AppConfig,
    scenario: Scenario,
    ticks: u64,
    json: bool,
    realtime: bool,
    easing: Option<&str>,
) -> Result<()> {
    let controller = with_easing(&config.controller, easing)?;
    info!(?scenario, ticks, realtime, easing = ?controller.decay_easing, "Starting simulation");

    let trace = if realtime {
        let mut simulation = Simulation::new(&controller, scenario)?;
        let mut interval = tokio::time::interval(Duration::from_millis(FRAME_MS as u64));
        while simulation.frame() < ticks {
            interval.tick().await;
            if !simulation.step() {
                break;
            }
        }
        simulation.finish()
    } else {
        trace(&controller, scenario, ticks)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    println!("{:>5}  {:>8}  {:<9}  {:>8}  {:>7}  segments", "frame", "time", "state", "progress", "rate");
    for record in &trace.frames {
        println!(
            "{:>5}  {:>6.0}ms  {:<9}  {:>8.4}  {:>+7.3}  {}{}",
            record.frame,
            record.time_ms,
            record.state.to_string(),
            record.progress,
            record.rate,
            record.segments.join(","),
            if record.wrapped { "  (wrapped)" } else { "" }
        );
    }

    println!();
    match trace.settled_at {
        Some(frame) => println!("Settled at frame {}", frame),
        None => println!("Did not settle within {} frames", ticks),
    }
    println!("Warnings: {}", trace.warnings);

    Ok(())
}

/// Apply an easing given by name on the command line
fn with_easing(base: &ControllerConfig, easing: Option<&str>) -> Result<ControllerConfig> {
    let Some(name) = easing else {
        return Ok(base.clone());
    };
    let registry = EasingRegistry::default();
    let decay_easing = registry.get(name).ok_or_else(|| {
        anyhow!("Unknown easing '{}', expected one of: {}", name, registry.names().join(", "))
    })?;
    Ok(ControllerConfig {
        decay_easing,
        ..base.clone()
    })
}

fn scenario_config(base: &ControllerConfig, scenario: Scenario) -> ControllerConfig {
    match scenario {
        Scenario::Fling => ControllerConfig {
            mode: ProgressMode::Wrapping,
            ..base.clone()
        },
        Scenario::Scroll => ControllerConfig {
            mode: ProgressMode::Bounded,
            ..base.clone()
        },
        Scenario::Idle => ControllerConfig {
            autoplay: true,
            ..base.clone()
        },
    }
}

fn script(scenario: Scenario) -> Vec<(u64, Cue)> {
    match scenario {
        // Leftward drag of 24 units per frame, then let go
        Scenario::Fling => {
            let mut cues: Vec<_> = (0..8).map(|i| (i + 1, Cue::Sample(400.0 - 24.0 * i as f64))).collect();
            cues.push((9, Cue::Release));
            cues
        }
        // Six scroll updates two frames apart
        Scenario::Scroll => {
            let mut cues: Vec<_> = (0..6).map(|i| (i * 2 + 1, Cue::Sample(6.0 * i as f64))).collect();
            cues.push((12, Cue::Release));
            cues
        }
        Scenario::Idle => Vec::new(),
    }
}

/// Three overlapping phases so traces show hand-offs
///
/// Laid out as [0, 0.4), [0.3, 0.7), [0.6, 1].
fn demo_timeline() -> Result<Timeline> {
    let timeline = Timeline::builder()
        .stagger_evenly("phase", 3, 0.25, untargeted)
        .build()?;
    Ok(timeline)
}

/// Headless runs have nothing to draw
fn untargeted(_: usize) -> impl FnMut(f64) -> scrubline_core::Result<()> {
    |_| Ok(())
}
