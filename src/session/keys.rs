use crate::changes::CommitPlan;
use crate::model::Level;

/// Normalized input. The host maps raw terminal events onto these before
/// calling `Session::handle_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    One,
    Two,
    Three,
    Yes,
    No,
    Quit,
}

impl Key {
    /// Digit keys pick a level: 1 = Local, 2 = Repo, 3 = User.
    pub fn level(self) -> Option<Level> {
        match self {
            Key::One => Some(Level::Local),
            Key::Two => Some(Level::Repo),
            Key::Three => Some(Level::User),
            _ => None,
        }
    }
}

/// What the host should do after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    None,
    /// Terminate without touching anything.
    Quit,
    /// The user executed the change set; persist it, then call
    /// `Session::finish_commit`.
    Commit(CommitPlan),
}
