//! Parameter rows and the trigger index.
//!
//! Rows are the flat, sorted view the editing tools display: one row per
//! (strategy, parameter) whose category is indexed. The trigger index inverts
//! rows by the numbers they reference.
//!
//! ## Row ordering
//!
//! Rows are stable-sorted by:
//!
//! 1. category rank (`Launch` < `ByKey` < `BL`/`Sell`/`Clear` < `Seconds`)
//! 2. strategy name
//! 3. folder name (top-level strategies sort as an empty folder name)
//! 4. parameter name
//!
//! Grouping in the editing tools depends on this order.
//!
//! ## Filtering
//!
//! Selection state (active numbers, solo number, search text, selected
//! strategies) belongs to the caller and is passed in through [`RowFilter`].

use super::classify::{Category, CategorySet, classify, extract_numbers};
use crate::{StrategyDocument, StrategyPath};
use std::collections::{BTreeMap, BTreeSet};

/// One indexed (strategy, parameter) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRow {
    pub path: StrategyPath,
    pub strategy: String,
    pub folder: Option<String>,
    pub param: String,
    pub category: Category,
    pub value: String,
    pub numbers: Vec<u32>,
}

impl ParameterRow {
    fn folder_name(&self) -> &str {
        self.folder.as_deref().unwrap_or("")
    }
}

/// Build the sorted row table for `document`. `Other` parameters are skipped.
pub fn build_rows(document: &StrategyDocument) -> Vec<ParameterRow> {
    let mut rows = Vec::new();
    for entry in document.strategies() {
        for (param, value) in entry.strategy.params() {
            let category = classify(param);
            if !category.is_indexed() {
                continue;
            }
            rows.push(ParameterRow {
                path: entry.path,
                strategy: entry.strategy.name.clone(),
                folder: entry.folder.map(str::to_string),
                param: param.clone(),
                category,
                value: value.clone(),
                numbers: extract_numbers(value, category),
            });
        }
    }

    rows.sort_by(|a, b| {
        a.category
            .rank()
            .cmp(&b.category.rank())
            .then_with(|| a.strategy.cmp(&b.strategy))
            .then_with(|| a.folder_name().cmp(b.folder_name()))
            .then_with(|| a.param.cmp(&b.param))
    });
    rows
}

/// Rows referencing one trigger number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerEntry {
    /// Number of (strategy, parameter) pairs referencing the number.
    pub count: usize,
    pub rows: Vec<ParameterRow>,
}

impl TriggerEntry {
    /// Distinct strategies among the rows.
    pub fn strategies(&self) -> BTreeSet<StrategyPath> {
        self.rows.iter().map(|row| row.path).collect()
    }
}

/// Inverted index `trigger number -> rows`, ordered by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerIndex {
    entries: BTreeMap<u32, TriggerEntry>,
}

impl TriggerIndex {
    pub fn get(&self, number: u32) -> Option<&TriggerEntry> {
        self.entries.get(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &TriggerEntry)> + '_ {
        self.entries.iter().map(|(number, entry)| (*number, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, number: u32) -> bool {
        self.entries.contains_key(&number)
    }

    /// Numbers referenced by more than one (strategy, parameter) pair.
    pub fn shared(&self) -> Vec<u32> {
        self.iter().filter(|(_, entry)| entry.count > 1).map(|(number, _)| number).collect()
    }

    /// Numbers launched by more than one strategy.
    pub fn conflicts(&self) -> Vec<u32> {
        self.iter()
            .filter(|(_, entry)| {
                let launchers: BTreeSet<StrategyPath> =
                    entry.rows.iter().filter(|row| row.category == Category::Launch).map(|row| row.path).collect();
                launchers.len() > 1
            })
            .map(|(number, _)| number)
            .collect()
    }

    /// Lowest number at or above `start` that no row references.
    pub fn next_free(&self, start: u32) -> Option<u32> {
        (start..=u32::MAX).find(|number| !self.entries.contains_key(number))
    }
}

/// Group rows by every number they reference.
pub fn build_trigger_index(rows: &[ParameterRow]) -> TriggerIndex {
    let mut entries: BTreeMap<u32, TriggerEntry> = BTreeMap::new();
    for row in rows {
        for &number in &row.numbers {
            let entry = entries.entry(number).or_default();
            entry.count += 1;
            entry.rows.push(row.clone());
        }
    }
    TriggerIndex { entries }
}

/// Caller-owned selection state applied by [`filter_rows`].
///
/// Empty fields do not filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFilter<'a> {
    /// Keep rows referencing any of these numbers.
    pub active: &'a [u32],
    /// Keep only rows referencing this number; overrides `active`.
    pub solo: Option<u32>,
    /// Case-insensitive substring over strategy, folder, parameter and value.
    pub search: &'a str,
    /// Keep only rows of these strategies.
    pub selected: &'a [StrategyPath],
    /// Keep only rows of these categories.
    pub categories: CategorySet,
}

impl RowFilter<'_> {
    pub fn matches(&self, row: &ParameterRow) -> bool {
        if let Some(solo) = self.solo {
            if !row.numbers.contains(&solo) {
                return false;
            }
        } else if !self.active.is_empty() && !row.numbers.iter().any(|n| self.active.contains(n)) {
            return false;
        }

        if !self.selected.is_empty() && !self.selected.contains(&row.path) {
            return false;
        }

        if !self.categories.is_empty() && !self.categories.contains_category(row.category) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [row.strategy.as_str(), row.folder_name(), row.param.as_str(), row.value.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Rows matching `filter`, in their original order.
pub fn filter_rows(rows: &[ParameterRow], filter: &RowFilter<'_>) -> Vec<ParameterRow> {
    rows.iter().filter(|row| filter.matches(row)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const TEXT: &str = "\
#Begin_Folder Night
##Begin_Strategy
StrategyName=Beta
TriggerKeysBL=5,7
TriggerKey=7
Comment=hello
##End_Strategy
#End_Folder
##Begin_Strategy
StrategyName=Alpha
TriggerSeconds=30
TriggerByKey=7 9
TriggerKey=7
##End_Strategy
";

    fn summary(rows: &[ParameterRow]) -> Vec<(&str, &str)> {
        rows.iter().map(|r| (r.strategy.as_str(), r.param.as_str())).collect()
    }

    #[test]
    fn rows_are_sorted_by_rank_strategy_folder_param() {
        let rows = build_rows(&parse(TEXT));

        assert_eq!(
            summary(&rows),
            vec![
                ("Alpha", "TriggerKey"),
                ("Beta", "TriggerKey"),
                ("Alpha", "TriggerByKey"),
                ("Beta", "TriggerKeysBL"),
                ("Alpha", "TriggerSeconds"),
            ]
        );
        assert_eq!(rows[1].folder.as_deref(), Some("Night"));
        assert!(rows[4].numbers.is_empty());
    }

    #[test]
    fn trigger_index_counts_parameter_pairs() {
        let rows = build_rows(&parse(TEXT));
        let index = build_trigger_index(&rows);

        let seven = index.get(7).unwrap();
        assert_eq!(seven.count, 4);
        assert_eq!(seven.strategies().len(), 2);
        assert_eq!(index.get(5).unwrap().count, 1);
        assert_eq!(index.shared(), vec![7]);
        assert_eq!(index.conflicts(), vec![7]);
        assert_eq!(index.next_free(5), Some(6));
        assert_eq!(index.next_free(1), Some(1));
    }

    #[test]
    fn filters_combine() {
        let rows = build_rows(&parse(TEXT));

        let solo = filter_rows(&rows, &RowFilter { solo: Some(9), active: &[5], ..RowFilter::default() });
        assert_eq!(summary(&solo), vec![("Alpha", "TriggerByKey")]);

        let active = filter_rows(&rows, &RowFilter { active: &[5, 9], ..RowFilter::default() });
        assert_eq!(summary(&active), vec![("Alpha", "TriggerByKey"), ("Beta", "TriggerKeysBL")]);

        let search = filter_rows(&rows, &RowFilter { search: " night ", ..RowFilter::default() });
        assert_eq!(search.len(), 2);

        let launch =
            filter_rows(&rows, &RowFilter { categories: CategorySet::LAUNCH, search: "alpha", ..RowFilter::default() });
        assert_eq!(summary(&launch), vec![("Alpha", "TriggerKey")]);

        let selected = [rows[0].path];
        let picked = filter_rows(&rows, &RowFilter { selected: &selected, ..RowFilter::default() });
        assert_eq!(picked.len(), 3);
    }
}
