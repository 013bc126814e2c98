use super::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogAction {
    /// Organization screen: put every permission back where it was loaded.
    Reset,
    /// Duplicates screen: discard everything. Leaving still takes a quit key.
    Exit,
}

impl DialogAction {
    pub fn title(self) -> &'static str {
        match self {
            DialogAction::Reset => "Reset",
            DialogAction::Exit => "Exit",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            DialogAction::Reset => "reset all changes?",
            DialogAction::Exit => "discard and exit?",
        }
    }
}

/// Layer drawn over the current screen; swallows all input while open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    /// Full-screen summary of the pending change set.
    Confirm { scroll: usize },
    Dialog(DialogAction),
}

pub(super) enum ModalAction {
    None,
    Close,
    Quit,
    Execute,
    Confirm(DialogAction),
}

pub(super) fn map_modal_key(modal: &mut Modal, key: Key, summary_len: usize) -> ModalAction {
    match modal {
        Modal::Confirm { scroll } => match key {
            Key::Enter | Key::Yes => ModalAction::Execute,
            Key::Escape | Key::No => ModalAction::Close,
            Key::Quit => ModalAction::Quit,
            Key::Up => {
                *scroll = scroll.saturating_sub(1);
                ModalAction::None
            }
            Key::Down => {
                if *scroll < summary_len.saturating_sub(1) {
                    *scroll += 1;
                }
                ModalAction::None
            }
            _ => ModalAction::None,
        },
        Modal::Dialog(action) => match key {
            Key::Enter | Key::Yes => ModalAction::Confirm(*action),
            Key::Escape | Key::No => ModalAction::Close,
            Key::Quit => ModalAction::Quit,
            _ => ModalAction::None,
        },
    }
}
