use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};

pub struct RevealWidget;

impl RevealWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let border_style = if app.focus == Focus::Reveal {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(" Staggered reveal ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let stage = app.reveal_stage.borrow();
        let lines: Vec<Line> = app
            .reveal_lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let amount = stage.amount(i);
                let (shown, hidden) = split_revealed(text, amount);
                let color = if amount >= 1.0 { theme.fg0 } else { theme.yellow };
                Line::from(vec![
                    Span::styled(shown, Style::default().fg(color)),
                    Span::styled(hidden, Style::default().fg(theme.bg2)),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Split `text` into the revealed prefix and a same-width placeholder for the rest
pub fn split_revealed(text: &str, amount: f64) -> (String, String) {
    let total = text.chars().count();
    let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
    let shown = (amount * total as f64).round() as usize;
    let prefix: String = text.chars().take(shown).collect();
    let rest: String = text
        .chars()
        .skip(shown)
        .map(|c| if c.is_whitespace() { c } else { '·' })
        .collect();
    (prefix, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_revealed() {
        assert_eq!(split_revealed("ab cd", 0.0), (String::new(), "·· ··".to_string()));
        assert_eq!(split_revealed("ab cd", 0.4), ("ab".to_string(), " ··".to_string()));
        assert_eq!(split_revealed("ab cd", 1.0), ("ab cd".to_string(), String::new()));
        assert_eq!(split_revealed("ab", f64::NAN).0, "");
    }
}
