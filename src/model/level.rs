use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Tier a permission can live at. Variants are declared in precedence order,
/// so the derived `Ord` gives `User > Repo > Local`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Local,
    Repo,
    User,
}

impl Level {
    /// Column order used everywhere a level list is shown or indexed.
    pub const ALL: [Level; 3] = [Level::Local, Level::Repo, Level::User];

    pub fn index(self) -> usize {
        match self {
            Level::Local => 0,
            Level::Repo => 1,
            Level::User => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Level> {
        Level::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Local => "Local",
            Level::Repo => "Repo",
            Level::User => "User",
        }
    }

    /// Duplicate auto-resolution rank: User 2, Repo 1, Local 0.
    pub fn precedence(self) -> u8 {
        match self {
            Level::Local => 0,
            Level::Repo => 1,
            Level::User => 2,
        }
    }

    /// Highest-precedence level in `levels`, if any.
    pub fn highest(levels: impl IntoIterator<Item = Level>) -> Option<Level> {
        levels.into_iter().max_by_key(|l| l.precedence())
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per level, indexable by `Level`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerLevel<T> {
    pub local: T,
    pub repo: T,
    pub user: T,
}

impl<T> PerLevel<T> {
    pub fn new(local: T, repo: T, user: T) -> Self {
        Self { local, repo, user }
    }

    pub fn from_fn(mut f: impl FnMut(Level) -> T) -> Self {
        Self {
            local: f(Level::Local),
            repo: f(Level::Repo),
            user: f(Level::User),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, &T)> {
        Level::ALL.into_iter().map(move |l| (l, &self[l]))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Level, &T) -> U) -> PerLevel<U> {
        PerLevel::from_fn(|l| f(l, &self[l]))
    }
}

impl<T> Index<Level> for PerLevel<T> {
    type Output = T;

    fn index(&self, level: Level) -> &T {
        match level {
            Level::Local => &self.local,
            Level::Repo => &self.repo,
            Level::User => &self.user,
        }
    }
}

impl<T> IndexMut<Level> for PerLevel<T> {
    fn index_mut(&mut self, level: Level) -> &mut T {
        match level {
            Level::Local => &mut self.local,
            Level::Repo => &mut self.repo,
            Level::User => &mut self.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_user_over_repo_over_local() {
        assert!(Level::User > Level::Repo);
        assert!(Level::Repo > Level::Local);
        assert_eq!(
            Level::highest([Level::Local, Level::Repo]),
            Some(Level::Repo)
        );
        assert_eq!(
            Level::highest([Level::User, Level::Local]),
            Some(Level::User)
        );
        assert_eq!(Level::highest([]), None);
        assert!(Level::User.precedence() > Level::Repo.precedence());
    }

    #[test]
    fn index_round_trips_through_column_order() {
        for (i, l) in Level::ALL.iter().enumerate() {
            assert_eq!(l.index(), i);
            assert_eq!(Level::from_index(i), Some(*l));
        }
        assert_eq!(Level::from_index(3), None);
    }

    #[test]
    fn per_level_indexing_hits_matching_slot() {
        let mut p = PerLevel::new(1, 2, 3);
        p[Level::Repo] += 10;
        assert_eq!(p.repo, 12);
        let labels: Vec<_> = p.iter().map(|(l, v)| format!("{}={}", l, v)).collect();
        assert_eq!(labels, vec!["Local=1", "Repo=12", "User=3"]);
    }
}
