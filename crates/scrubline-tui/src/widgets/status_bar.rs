use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let demo = app.focused();

        let (status_text, status_color) = if let Some(msg) = &app.status_message {
            (format!(" {}", msg), theme.warning)
        } else {
            (
                format!(
                    " {} | frames: {} | warnings: {}",
                    app.focus.title(),
                    demo.controller().frames(),
                    demo.controller().diagnostics().total()
                ),
                theme.fg0,
            )
        };

        let help_hint = " q:quit tab:demo space:pause h/l:seek g/G:ends ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
