use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Focus};

pub struct MarqueeWidget;

impl MarqueeWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let border_style = if app.focus == Focus::Marquee {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(" Marquee ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Center one row of text vertically
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .split(inner);

        let offset = app.marquee_stage.borrow().offset;
        let window = marquee_window(&app.marquee_text, offset, inner.width as usize);
        let text = Paragraph::new(Line::from(Span::styled(
            window,
            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(text, rows[1]);

        let hint = Paragraph::new(Line::from(Span::styled(
            "drag or scroll to fling",
            Style::default().fg(theme.grey0),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, rows[2]);
    }
}

/// The slice of an endlessly repeated `text` visible at `offset`
///
/// `offset` is a fraction of one pass; the result is at most `width` columns.
pub fn marquee_window(text: &str, offset: f64, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || width == 0 {
        return String::new();
    }

    let len = chars.len();
    let offset = if offset.is_finite() { offset.rem_euclid(1.0) } else { 0.0 };
    let start = ((offset * len as f64).floor() as usize) % len;

    let mut window = String::new();
    let mut used = 0;
    // Bounded so text made only of zero-width chars still terminates
    for c in chars.iter().cycle().skip(start).take(len + width) {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        window.push(*c);
        used += w;
    }
    window
}
