use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::WHEEL_STEP;

/// Progress moved by one arrow key press
pub const NUDGE: f64 = 0.05;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    SwitchDemo,
    TogglePause,
    /// Seek relative to the current progress
    Nudge(f64),
    SeekStart,
    SeekEnd,
    /// Pointer held at this column
    Drag(f64),
    Release,
    /// Virtual pointer movement from one wheel notch
    Wheel(f64),
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchDemo,
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Left | KeyCode::Char('h') => Action::Nudge(-NUDGE),
        KeyCode::Right | KeyCode::Char('l') => Action::Nudge(NUDGE),
        KeyCode::Home | KeyCode::Char('g') => Action::SeekStart,
        KeyCode::End | KeyCode::Char('G') => Action::SeekEnd,
        _ => Action::None,
    }
}

/// Handle a mouse event; the column is the raw input coordinate
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            Action::Drag(mouse.column as f64)
        }
        MouseEventKind::Up(MouseButton::Left) => Action::Release,
        MouseEventKind::ScrollDown => Action::Wheel(WHEEL_STEP),
        MouseEventKind::ScrollUp => Action::Wheel(-WHEEL_STEP),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 3,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Tab)), Action::SwitchDemo);
        assert_eq!(handle_key_event(key(KeyCode::Left)), Action::Nudge(-NUDGE));
        assert_eq!(handle_key_event(key(KeyCode::Char('G'))), Action::SeekEnd);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), Action::None);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_mouse_gestures() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 12)),
            Action::Drag(12.0)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9)),
            Action::Drag(9.0)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 9)),
            Action::Release
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, 0)),
            Action::Wheel(-WHEEL_STEP)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, 4)),
            Action::None
        );
    }
}
