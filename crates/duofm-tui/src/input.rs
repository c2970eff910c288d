use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use duofm_core::Key;

/// What the main loop should do with a terminal key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Feed the key to the dispatcher.
    Key(Key),
    /// Quit immediately (Ctrl+C, not remappable).
    Quit,
    /// Nothing to do.
    None,
}

/// Translates a crossterm key event into an [`InputAction`].
///
/// Only presses count; releases and repeats are dropped. Shift is folded
/// into the character itself. Characters typed with Ctrl+Alt (AltGr on
/// Windows) pass through. Other modifier combinations are ignored except
/// Ctrl+C.
pub fn translate_key(key: KeyEvent) -> InputAction {
    if key.kind != KeyEventKind::Press {
        return InputAction::None;
    }
    let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    if key.modifiers.contains(altgr) {
        return match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::SUPER) => {
                InputAction::Key(Key::Char(c))
            }
            _ => InputAction::None,
        };
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputAction::Quit,
            _ => InputAction::None,
        };
    }
    if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) {
        return InputAction::None;
    }

    let translated = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::F(n) => Key::F(n),
        _ => return InputAction::None,
    };
    InputAction::Key(translated)
}
