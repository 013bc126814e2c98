use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::Key;

/// Terminal key event -> session key. Arrows and h/j/k/l both navigate.
pub(super) fn map_key(key: KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Key::Quit),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    let mapped = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('j') => Key::Down,
        KeyCode::Left | KeyCode::Char('h') => Key::Left,
        KeyCode::Right | KeyCode::Char('l') => Key::Right,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char('1') => Key::One,
        KeyCode::Char('2') => Key::Two,
        KeyCode::Char('3') => Key::Three,
        KeyCode::Char('y') | KeyCode::Char('Y') => Key::Yes,
        KeyCode::Char('n') | KeyCode::Char('N') => Key::No,
        KeyCode::Char('q') => Key::Quit,
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
#[path = "../tests/tui_shell/input_tests.rs"]
mod tests;
