use super::TocEntry;
use serde::Serialize;
use std::collections::BTreeSet;

/// Outline titles grouped by level, levels kept in the order they first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelInventory {
    levels: Vec<(u32, Vec<String>)>,
}

/// Display-oriented view of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub count: usize,
    pub samples: Vec<String>,
}

/// Group outline entries by level.
pub fn summarize(entries: &[TocEntry]) -> LevelInventory {
    let mut inventory = LevelInventory::default();
    for entry in entries {
        match inventory.levels.iter_mut().find(|(l, _)| *l == entry.level) {
            Some((_, titles)) => titles.push(entry.title.clone()),
            None => inventory
                .levels
                .push((entry.level, vec![entry.title.clone()])),
        }
    }
    inventory
}

impl LevelInventory {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Every level that has at least one entry.
    pub fn levels_present(&self) -> BTreeSet<u32> {
        self.levels.iter().map(|(l, _)| *l).collect()
    }

    pub fn contains(&self, level: u32) -> bool {
        self.levels.iter().any(|(l, _)| *l == level)
    }

    /// Titles at `level` in outline order.
    pub fn titles(&self, level: u32) -> &[String] {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, titles)| titles.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, level: u32) -> usize {
        self.titles(level).len()
    }

    /// Per-level counts with up to `max_samples` titles each, ascending by level.
    pub fn summaries(&self, max_samples: usize) -> Vec<LevelSummary> {
        let mut summaries: Vec<LevelSummary> = self
            .levels
            .iter()
            .map(|(level, titles)| LevelSummary {
                level: *level,
                count: titles.len(),
                samples: titles.iter().take(max_samples).cloned().collect(),
            })
            .collect();
        summaries.sort_by_key(|s| s.level);
        summaries
    }
}
