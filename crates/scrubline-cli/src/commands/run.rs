use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{error, info};

use scrubline_core::AppConfig;
use scrubline_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    widgets::{MarqueeWidget, PlaybackWidget, RevealWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Build the demos before touching the terminal so config errors print normally
    let mut app = App::new(&config)?;
    let event_handler = EventHandler::new(config.demo.tick_rate_ms);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Scrubline"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = quiet_panics(|| event_loop(&mut terminal, &mut app, &event_handler));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        marquee_frames = app.marquee.controller().frames(),
        reveal_frames = app.reveal.controller().frames(),
        "Demo closed"
    );
    result
}

/// Run `body` with panic messages sent to the log instead of the terminal
///
/// Segment panics are caught by the engine, but the default hook still
/// prints them over the alternate screen.
fn quiet_panics<T>(body: impl FnOnce() -> T) -> T {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        error!(%info, "Panic while the demo owned the terminal");
    }));
    let value = body();
    std::panic::set_hook(default_hook);
    value
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // Deliver ticks with the real elapsed time so slow terminals keep pace
        let now = Instant::now();
        if now.duration_since(last_frame) >= event_handler.tick_rate() {
            let delta_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
            last_frame = now;
            let now_ms = app.now_ms();
            app.on_tick(delta_ms, now_ms);
        }

        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: demos, playback gauge, status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(7),
                    Constraint::Min(5),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(size);

            MarqueeWidget::render(frame, main_layout[0], app);
            RevealWidget::render(frame, main_layout[1], app);
            PlaybackWidget::render(frame, main_layout[2], app);
            StatusBarWidget::render(frame, main_layout[3], app);
        })?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => app.apply(handle_key_event(key)),
                AppEvent::Mouse(mouse) => app.apply(handle_mouse_event(mouse)),
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_panics_passes_caught_panics_through() {
        let caught = quiet_panics(|| std::panic::catch_unwind(|| panic!("segment blew up")).is_err());
        assert!(caught);
        assert_eq!(quiet_panics(|| 7), 7);
    }
}
