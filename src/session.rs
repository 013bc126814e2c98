use crate::changes::{ChangeSet, CommitPlan};
use crate::model::{Duplicate, Level, PerLevel, Permission, SourceLists};
use crate::registry::Registry;
use crate::resolve::{DuplicateSet, ResolvedDuplicate};

mod keys;
mod modal;

pub use self::keys::{Key, Outcome};
pub use self::modal::{DialogAction, Modal};
use self::modal::{ModalAction, map_modal_key};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Duplicates,
    Organization,
}

impl Screen {
    pub fn toggle(self) -> Self {
        match self {
            Screen::Duplicates => Screen::Organization,
            Screen::Organization => Screen::Duplicates,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Duplicates => "Duplicates",
            Screen::Organization => "Organization",
        }
    }
}

/// All mutable state of one reconciliation run. Every transition goes through
/// `&mut self`, so one owner serializes input handling and rendering.
#[derive(Clone, Debug)]
pub struct Session {
    registry: Registry,
    duplicates: DuplicateSet,
    present: PerLevel<bool>,

    screen: Screen,
    focused_column: usize,
    selections: PerLevel<usize>,
    modal: Option<Modal>,
}

impl Session {
    pub fn load(sources: &SourceLists) -> Self {
        let registry = Registry::load(sources);
        let duplicates = DuplicateSet::detect(sources);
        tracing::info!(
            permissions = registry.len(),
            duplicates = duplicates.len(),
            local = registry.count_in(Level::Local),
            repo = registry.count_in(Level::Repo),
            user = registry.count_in(Level::User),
            "session loaded"
        );
        Self {
            registry,
            duplicates,
            present: sources.present.clone(),
            screen: Screen::Duplicates,
            focused_column: 0,
            selections: PerLevel::default(),
            modal: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn is_present(&self, level: Level) -> bool {
        self.present[level]
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    pub fn focused_level(&self) -> Level {
        Level::from_index(self.focused_column).unwrap_or(Level::Local)
    }

    pub fn selection(&self, level: Level) -> usize {
        self.selections[level]
    }

    pub fn level_view(&self, level: Level) -> Vec<&str> {
        self.registry.level_view(level)
    }

    pub fn permissions_in(&self, level: Level) -> Vec<&Permission> {
        self.registry.permissions_in(level)
    }

    pub fn selected_permission(&self) -> Option<&Permission> {
        let level = self.focused_level();
        self.registry
            .permissions_in(level)
            .get(self.selections[level])
            .copied()
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        self.duplicates.items()
    }

    pub fn duplicate_cursor(&self) -> usize {
        self.duplicates.cursor()
    }

    pub fn selected_duplicate(&self) -> Option<&Duplicate> {
        self.duplicates.selected()
    }

    pub fn has_unresolved_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    pub fn change_set(&self) -> ChangeSet {
        ChangeSet::compute(&self.registry, &self.duplicates)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.registry.permissions().iter().any(|p| p.is_moved())
            || self.duplicates.has_keep_choices()
    }

    pub fn commit_plan(&self) -> CommitPlan {
        CommitPlan::compute(&self.registry, &self.duplicates)
    }

    pub fn handle_key(&mut self, key: Key) -> Outcome {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        match key {
            Key::Quit => return Outcome::Quit,
            Key::Tab => self.screen = self.screen.toggle(),
            Key::Left => self.shift_column(-1),
            Key::Right => self.shift_column(1),
            Key::Up => self.shift_row(-1),
            Key::Down => self.shift_row(1),
            Key::One | Key::Two | Key::Three => {
                if let Some(level) = key.level() {
                    self.assign_level(level);
                }
            }
            Key::Enter => {
                if self.has_pending_changes() {
                    self.modal = Some(Modal::Confirm { scroll: 0 });
                }
            }
            Key::Escape => {
                if self.has_pending_changes() {
                    let action = match self.screen {
                        Screen::Duplicates => DialogAction::Exit,
                        Screen::Organization => DialogAction::Reset,
                    };
                    self.modal = Some(Modal::Dialog(action));
                }
            }
            Key::Yes | Key::No => {}
        }
        Outcome::None
    }

    fn handle_modal_key(&mut self, key: Key) -> Outcome {
        let summary_len = self.change_set().summary_lines().len();
        let action = match self.modal.as_mut() {
            Some(m) => map_modal_key(m, key, summary_len),
            None => return Outcome::None,
        };

        match action {
            ModalAction::None => Outcome::None,
            ModalAction::Close => {
                self.modal = None;
                Outcome::None
            }
            ModalAction::Quit => {
                self.modal = None;
                Outcome::Quit
            }
            ModalAction::Execute => {
                self.modal = None;
                let plan = self.commit_plan();
                tracing::info!(
                    resolved = plan.resolved.len(),
                    local = plan.lists[Level::Local].len(),
                    repo = plan.lists[Level::Repo].len(),
                    user = plan.lists[Level::User].len(),
                    "change set executed"
                );
                Outcome::Commit(plan)
            }
            ModalAction::Confirm(action) => {
                self.modal = None;
                self.reset();
                tracing::info!(action = action.title(), "pending changes discarded");
                Outcome::None
            }
        }
    }

    fn gated(&self) -> bool {
        self.screen == Screen::Organization && self.has_unresolved_duplicates()
    }

    fn shift_column(&mut self, delta: isize) {
        if self.screen != Screen::Organization || self.gated() {
            return;
        }
        self.focused_column = self.focused_column.saturating_add_signed(delta).min(2);
    }

    fn shift_row(&mut self, delta: isize) {
        match self.screen {
            Screen::Duplicates => {
                if delta < 0 {
                    self.duplicates.move_up();
                } else {
                    self.duplicates.move_down();
                }
            }
            Screen::Organization => {
                if self.gated() {
                    return;
                }
                let level = self.focused_level();
                let len = self.registry.count_in(level);
                let row = self.selections[level].saturating_add_signed(delta);
                self.selections[level] = row.min(len.saturating_sub(1));
            }
        }
    }

    fn assign_level(&mut self, level: Level) {
        match self.screen {
            Screen::Duplicates => {
                let cursor = self.duplicates.cursor();
                self.duplicates.set_keep_level(cursor, level);
            }
            Screen::Organization => {
                if self.gated() {
                    return;
                }
                let from = self.focused_level();
                let Some(name) = self.selected_permission().map(|p| p.name.clone()) else {
                    return;
                };
                self.move_permission(&name, from, level);
            }
        }
    }

    /// Moves `name` between levels and re-clamps the source column's selection.
    /// Returns false when nothing changed.
    pub fn move_permission(&mut self, name: &str, from: Level, to: Level) -> bool {
        if !self.registry.move_permission(name, from, to) {
            return false;
        }
        tracing::info!(permission = %name, %from, %to, "permission reassigned");
        self.clamp_selection(from);
        true
    }

    fn clamp_selection(&mut self, level: Level) {
        let len = self.registry.count_in(level);
        self.selections[level] = self.selections[level].min(len.saturating_sub(1));
    }

    /// Only rollback primitive: every move undone, keep levels cleared, all
    /// column selections back to the top.
    pub fn reset(&mut self) {
        let restored = self.registry.restore_original_levels();
        self.duplicates.clear_keep_levels();
        self.selections = PerLevel::default();
        tracing::info!(restored, "session reset");
    }

    /// Call once `plan` from `Outcome::Commit` has been persisted. Duplicates
    /// are committed into the registry and the session re-baselines on the
    /// plan's lists, so nothing is pending afterwards.
    pub fn finish_commit(&mut self, plan: &CommitPlan) -> Vec<ResolvedDuplicate> {
        let resolved = self.duplicates.commit(&mut self.registry);
        let present = PerLevel::from_fn(|l| self.present[l] || !plan.lists[l].is_empty());

        let screen = self.screen;
        let focused_column = self.focused_column;
        *self = Session::load(&SourceLists {
            names: plan.lists.clone(),
            present,
        });
        self.screen = screen;
        self.focused_column = focused_column;
        resolved
    }
}
