use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::app::App;

/// Progress gauge with the focused controller's state and rate
pub struct PlaybackWidget;

impl PlaybackWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let demo = app.focused();
        let playback = demo.playback();
        let state = demo.state();
        let paused = !demo.controller().is_running();

        let mut title = vec![
            Span::raw(" "),
            Span::styled(
                state.to_string().to_uppercase(),
                Style::default()
                    .fg(theme.state_color(state))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("rate {:+.2}x", playback.rate),
                Style::default().fg(theme.rate_color(playback.rate)),
            ),
        ];
        if paused {
            title.push(Span::styled(" paused", Style::default().fg(theme.grey2)));
        }
        title.push(Span::raw(" "));

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Line::from(title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.grey0)),
            )
            .gauge_style(Style::default().fg(theme.accent).bg(theme.bg1))
            .ratio(playback.progress.clamp(0.0, 1.0))
            .label(format!("{:5.1}%", playback.progress * 100.0));
        frame.render_widget(gauge, area);
    }
}
