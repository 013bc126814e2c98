use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::level::{Level, PerLevel};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    original_level: Level,
    pub current_level: Level,
}

impl Permission {
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            original_level: level,
            current_level: level,
        }
    }

    pub fn original_level(&self) -> Level {
        self.original_level
    }

    pub fn is_moved(&self) -> bool {
        self.current_level != self.original_level
    }
}

/// A name that appeared in more than one source list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duplicate {
    pub name: String,
    pub levels: BTreeSet<Level>,
    pub keep_level: Option<Level>,
}

impl Duplicate {
    pub fn new(name: impl Into<String>, levels: BTreeSet<Level>) -> Self {
        let keep_level = Level::highest(levels.iter().copied());
        Self {
            name: name.into(),
            levels,
            keep_level,
        }
    }

    /// Levels the name will be removed from once the keep level is committed.
    pub fn dropped_levels(&self) -> Vec<Level> {
        match self.keep_level {
            Some(keep) => self.levels.iter().copied().filter(|l| *l != keep).collect(),
            None => Vec::new(),
        }
    }
}

/// The three raw name lists handed over by the loading collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLists {
    pub names: PerLevel<Vec<String>>,
    pub present: PerLevel<bool>,
}

impl SourceLists {
    pub fn new(local: Vec<String>, repo: Vec<String>, user: Vec<String>) -> Self {
        Self {
            present: PerLevel::new(true, true, true),
            names: PerLevel::new(local, repo, user),
        }
    }
}

/// Case-insensitive ascending; exact byte order breaks ties so the order is total.
pub fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| name_order(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keep_defaults_to_highest_present_level() {
        let d = Duplicate::new("Write", BTreeSet::from([Level::Local, Level::Repo]));
        assert_eq!(d.keep_level, Some(Level::Repo));
        assert_eq!(d.dropped_levels(), vec![Level::Local]);
    }

    #[test]
    fn name_order_ignores_case_then_falls_back_to_bytes() {
        let mut v = vec!["b", "A", "a", "C"];
        sort_names(&mut v);
        assert_eq!(v, vec!["A", "a", "b", "C"]);
    }

    #[test]
    fn case_only_ties_ignore_input_order() {
        let mut forward = vec!["a", "A"];
        let mut reverse = vec!["A", "a"];
        sort_names(&mut forward);
        sort_names(&mut reverse);
        assert_eq!(forward, vec!["A", "a"]);
        assert_eq!(forward, reverse);
        assert_eq!(name_order("a", "A"), Ordering::Greater);
    }
}
