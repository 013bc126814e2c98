use serde::{Deserialize, Serialize};

use crate::model::{Level, PerLevel, name_order, sort_names};
use crate::registry::Registry;
use crate::resolve::{DuplicateSet, ResolvedDuplicate};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub name: String,
    pub from: Level,
    pub to: Level,
}

/// Pending diff between the loaded state and the current one. Always derived
/// fresh from the registry and duplicate set; never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Keyed by destination level.
    pub moves: PerLevel<Vec<PendingMove>>,
    pub resolved: Vec<ResolvedDuplicate>,
}

impl ChangeSet {
    pub fn compute(registry: &Registry, duplicates: &DuplicateSet) -> Self {
        let mut moves: PerLevel<Vec<PendingMove>> = PerLevel::default();
        for p in registry.permissions().iter().filter(|p| p.is_moved()) {
            moves[p.current_level].push(PendingMove {
                name: p.name.clone(),
                from: p.original_level(),
                to: p.current_level,
            });
        }
        for level in Level::ALL {
            moves[level].sort_by(|a, b| name_order(&a.name, &b.name));
        }

        let mut resolved = duplicates.resolved();
        resolved.sort_by(|a, b| name_order(&a.name, &b.name));

        Self { moves, resolved }
    }

    pub fn move_count(&self) -> usize {
        self.moves.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn total(&self) -> usize {
        self.move_count() + self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.is_empty() {
            lines.push("no pending changes".to_string());
            return lines;
        }

        if self.move_count() > 0 {
            lines.push(format!("moves ({})", self.move_count()));
            for (level, moves) in self.moves.iter() {
                if moves.is_empty() {
                    continue;
                }
                lines.push(format!("  -> {}", level));
                for m in moves {
                    lines.push(format!("     {} (from {})", m.name, m.from));
                }
            }
        }

        if !self.resolved.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("duplicates resolved ({})", self.resolved.len()));
            for r in &self.resolved {
                let dropped: Vec<&str> = r.dropped.iter().map(|l| l.label()).collect();
                lines.push(format!(
                    "  {}: keep {}, remove from {}",
                    r.name,
                    r.keep,
                    dropped.join(", ")
                ));
            }
        }
        lines
    }
}

/// What the persistence side needs at commit time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPlan {
    pub lists: PerLevel<Vec<String>>,
    pub resolved: Vec<ResolvedDuplicate>,
}

impl CommitPlan {
    /// Final per-level lists: every name exactly once, duplicates at their keep
    /// level (or wherever they currently sit when no keep level is chosen).
    pub fn compute(registry: &Registry, duplicates: &DuplicateSet) -> Self {
        let resolved = duplicates.resolved();
        let mut lists: PerLevel<Vec<String>> = PerLevel::default();
        for p in registry.permissions() {
            let level = resolved
                .iter()
                .find(|r| r.name == p.name)
                .map(|r| r.keep)
                .unwrap_or(p.current_level);
            lists[level].push(p.name.clone());
        }
        for level in Level::ALL {
            sort_names(&mut lists[level]);
        }
        Self { lists, resolved }
    }
}
