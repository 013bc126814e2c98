use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::map_key;
use crate::session::Key;

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn arrows_and_vi_keys_navigate() {
    assert_eq!(map_key(plain(KeyCode::Up)), Some(Key::Up));
    assert_eq!(map_key(plain(KeyCode::Char('k'))), Some(Key::Up));
    assert_eq!(map_key(plain(KeyCode::Char('j'))), Some(Key::Down));
    assert_eq!(map_key(plain(KeyCode::Char('h'))), Some(Key::Left));
    assert_eq!(map_key(plain(KeyCode::Right)), Some(Key::Right));
}

#[test]
fn digits_map_to_levels() {
    assert_eq!(
        map_key(plain(KeyCode::Char('1'))).and_then(Key::level),
        Some(crate::model::Level::Local)
    );
    assert_eq!(map_key(plain(KeyCode::Char('3'))), Some(Key::Three));
    assert_eq!(map_key(plain(KeyCode::Char('4'))), None);
}

#[test]
fn ctrl_c_quits_and_other_chords_are_dropped() {
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Key::Quit)
    );
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT)),
        None
    );
}

#[test]
fn shifted_answers_still_count() {
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT)),
        Some(Key::Yes)
    );
}
