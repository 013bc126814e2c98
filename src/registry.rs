use std::collections::{BTreeMap, HashSet};

use crate::model::{Level, PerLevel, Permission, SourceLists, name_order};

/// Authoritative permission list. Per-level views are projected from it on
/// every read, so they cannot drift from `current_level`.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    permissions: Vec<Permission>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewDivergence {
    Unsorted { level: Level, index: usize },
    WrongLevel { level: Level, name: String },
    Repeated { name: String },
    Missing { name: String },
}

impl std::fmt::Display for ViewDivergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewDivergence::Unsorted { level, index } => {
                write!(f, "{} view out of order at row {}", level, index)
            }
            ViewDivergence::WrongLevel { level, name } => {
                write!(f, "{} listed under {} but assigned elsewhere", name, level)
            }
            ViewDivergence::Repeated { name } => write!(f, "{} appears more than once", name),
            ViewDivergence::Missing { name } => write!(f, "{} missing from every view", name),
        }
    }
}

impl std::error::Error for ViewDivergence {}

impl Registry {
    /// One permission per distinct name. A name found in several lists starts
    /// at the highest-precedence one.
    pub fn load(sources: &SourceLists) -> Self {
        let mut origin: BTreeMap<&str, Level> = BTreeMap::new();
        let mut order: Vec<&str> = Vec::new();
        for level in Level::ALL {
            for name in &sources.names[level] {
                match origin.get_mut(name.as_str()) {
                    Some(prev) => *prev = (*prev).max(level),
                    None => {
                        origin.insert(name.as_str(), level);
                        order.push(name.as_str());
                    }
                }
            }
        }

        let permissions = order
            .into_iter()
            .map(|name| Permission::new(name, origin[name]))
            .collect();
        Self { permissions }
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.name == name)
    }

    pub fn permissions_in(&self, level: Level) -> Vec<&Permission> {
        let mut out: Vec<&Permission> = self
            .permissions
            .iter()
            .filter(|p| p.current_level == level)
            .collect();
        out.sort_by(|a, b| name_order(&a.name, &b.name));
        out
    }

    pub fn level_view(&self, level: Level) -> Vec<&str> {
        self.permissions_in(level)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn level_views(&self) -> PerLevel<Vec<&str>> {
        PerLevel::from_fn(|l| self.level_view(l))
    }

    pub fn count_in(&self, level: Level) -> usize {
        self.permissions
            .iter()
            .filter(|p| p.current_level == level)
            .count()
    }

    /// Moves `name` from `from` to `to`. Returns false, leaving everything
    /// untouched, when the levels match or `name` is not currently at `from`.
    pub fn move_permission(&mut self, name: &str, from: Level, to: Level) -> bool {
        if from == to {
            return false;
        }
        let Some(p) = self
            .permissions
            .iter_mut()
            .find(|p| p.name == name && p.current_level == from)
        else {
            return false;
        };
        p.current_level = to;
        tracing::debug!(permission = %name, %from, %to, "moved permission");
        true
    }

    /// Sends every moved permission back to where it was loaded.
    pub fn restore_original_levels(&mut self) -> usize {
        let moved: Vec<(String, Level, Level)> = self
            .permissions
            .iter()
            .filter(|p| p.is_moved())
            .map(|p| (p.name.clone(), p.current_level, p.original_level()))
            .collect();
        for (name, from, to) in &moved {
            self.move_permission(name, *from, *to);
        }
        moved.len()
    }

    pub fn verify_views(&self) -> Result<(), ViewDivergence> {
        let mut seen: HashSet<&str> = HashSet::new();
        for level in Level::ALL {
            let view = self.level_view(level);
            for (i, pair) in view.windows(2).enumerate() {
                if name_order(pair[0], pair[1]).is_gt() {
                    return Err(ViewDivergence::Unsorted {
                        level,
                        index: i + 1,
                    });
                }
            }
            for name in view {
                if self.get(name).map(|p| p.current_level) != Some(level) {
                    return Err(ViewDivergence::WrongLevel {
                        level,
                        name: name.to_string(),
                    });
                }
                if !seen.insert(name) {
                    return Err(ViewDivergence::Repeated {
                        name: name.to_string(),
                    });
                }
            }
        }
        if let Some(p) = self
            .permissions
            .iter()
            .find(|p| !seen.contains(p.name.as_str()))
        {
            return Err(ViewDivergence::Missing {
                name: p.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Registry {
        Registry::load(&SourceLists::new(
            names(&["write", "Bash(ls)", "Read"]),
            names(&["Write", "Edit"]),
            names(&["Read", "glob"]),
        ))
    }

    #[test]
    fn load_assigns_each_name_once_by_precedence() {
        let r = sample();
        assert_eq!(r.len(), 6);
        assert_eq!(r.get("Read").map(|p| p.original_level()), Some(Level::User));
        assert_eq!(r.level_view(Level::Local), vec!["Bash(ls)", "write"]);
        assert_eq!(r.level_view(Level::Repo), vec!["Edit", "Write"]);
        assert_eq!(r.level_view(Level::User), vec!["glob", "Read"]);
        assert_eq!(r.verify_views(), Ok(()));
    }

    #[test]
    fn same_name_twice_in_one_list_is_collapsed() {
        let r = Registry::load(&SourceLists::new(names(&["A", "A"]), vec![], vec![]));
        assert_eq!(r.level_view(Level::Local), vec!["A"]);
    }

    #[test]
    fn move_requires_matching_source_level() {
        let mut r = sample();
        assert!(!r.move_permission("Edit", Level::Local, Level::User));
        assert!(!r.move_permission("Edit", Level::Repo, Level::Repo));
        assert!(!r.move_permission("Nope", Level::Repo, Level::User));
        assert_eq!(r.level_view(Level::Repo), vec!["Edit", "Write"]);

        assert!(r.move_permission("Edit", Level::Repo, Level::User));
        assert_eq!(r.level_view(Level::User), vec!["Edit", "glob", "Read"]);
        assert_eq!(r.level_view(Level::Repo), vec!["Write"]);
        assert_eq!(r.verify_views(), Ok(()));
    }

    #[test]
    fn move_and_move_back_restores_both_views() {
        let mut r = sample();
        let before = (r.level_view(Level::Local).join(","), r.level_view(Level::User).join(","));
        assert!(r.move_permission("write", Level::Local, Level::User));
        assert!(r.move_permission("write", Level::User, Level::Local));
        let after = (r.level_view(Level::Local).join(","), r.level_view(Level::User).join(","));
        assert_eq!(before, after);
        assert_eq!(r.get("write").map(|p| p.current_level), Some(Level::Local));
    }

    #[test]
    fn restore_original_levels_undoes_all_moves() {
        let mut r = sample();
        r.move_permission("Edit", Level::Repo, Level::Local);
        r.move_permission("glob", Level::User, Level::Repo);
        assert_eq!(r.restore_original_levels(), 2);
        assert!(r.permissions().iter().all(|p| !p.is_moved()));
        assert_eq!(r.restore_original_levels(), 0);
    }
}
