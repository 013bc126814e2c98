use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Duplicate, Level, SourceLists, name_order};
use crate::registry::Registry;

/// Names present in at least two of the source lists, in display order.
pub fn detect_duplicates(sources: &SourceLists) -> Vec<Duplicate> {
    let mut seen: BTreeMap<&str, BTreeSet<Level>> = BTreeMap::new();
    for level in Level::ALL {
        for name in &sources.names[level] {
            seen.entry(name.as_str()).or_default().insert(level);
        }
    }

    let mut out: Vec<Duplicate> = seen
        .into_iter()
        .filter(|(_, levels)| levels.len() >= 2)
        .map(|(name, levels)| Duplicate::new(name, levels))
        .collect();
    out.sort_by(|a, b| name_order(&a.name, &b.name));
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDuplicate {
    pub name: String,
    pub keep: Level,
    pub dropped: Vec<Level>,
}

impl ResolvedDuplicate {
    fn from_duplicate(d: &Duplicate) -> Option<Self> {
        Some(Self {
            name: d.name.clone(),
            keep: d.keep_level?,
            dropped: d.dropped_levels(),
        })
    }
}

/// Duplicate collection plus the list cursor of the duplicates screen.
/// Every entry counts as unresolved until `commit` drains the set.
#[derive(Clone, Debug, Default)]
pub struct DuplicateSet {
    items: Vec<Duplicate>,
    cursor: usize,
}

impl DuplicateSet {
    pub fn new(items: Vec<Duplicate>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn detect(sources: &SourceLists) -> Self {
        Self::new(detect_duplicates(sources))
    }

    pub fn items(&self) -> &[Duplicate] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.min(self.items.len().saturating_sub(1))
    }

    pub fn selected(&self) -> Option<&Duplicate> {
        self.items.get(self.cursor())
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.items.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max);
    }

    /// Records which level survives for duplicate `index`. Only levels the name
    /// was actually loaded from are accepted; anything else is a no-op.
    pub fn set_keep_level(&mut self, index: usize, level: Level) -> bool {
        let Some(d) = self.items.get_mut(index) else {
            return false;
        };
        if !d.levels.contains(&level) {
            tracing::debug!(permission = %d.name, %level, "keep level not among duplicate levels");
            return false;
        }
        d.keep_level = Some(level);
        tracing::info!(permission = %d.name, keep = %level, "keep level chosen");
        true
    }

    pub fn clear_keep_levels(&mut self) {
        for d in &mut self.items {
            d.keep_level = None;
        }
    }

    pub fn has_keep_choices(&self) -> bool {
        self.items.iter().any(|d| d.keep_level.is_some())
    }

    pub fn resolved(&self) -> Vec<ResolvedDuplicate> {
        self.items
            .iter()
            .filter_map(ResolvedDuplicate::from_duplicate)
            .collect()
    }

    /// Pins every duplicate with a keep level to that level in `registry`, then
    /// empties the collection.
    pub fn commit(&mut self, registry: &mut Registry) -> Vec<ResolvedDuplicate> {
        let resolved = self.resolved();
        for r in &resolved {
            if let Some(current) = registry.get(&r.name).map(|p| p.current_level) {
                registry.move_permission(&r.name, current, r.keep);
            }
        }
        tracing::info!(
            resolved = resolved.len(),
            total = self.items.len(),
            "committed duplicate resolution"
        );
        self.items.clear();
        self.cursor = 0;
        resolved
    }
}
