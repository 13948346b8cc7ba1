//! Strategy document parser and parameter diff/command engine.
//!
//! The crate turns loosely delimited strategy dumps into a [`StrategyDocument`],
//! indexes the trigger keys embedded in parameter values, and computes
//! reversible `SetParam` command packs from user edits.
//!
//! ```text
//! raw text ── parse ──▶ StrategyDocument ── build_rows ──▶ ParameterRow[] ── build_trigger_index
//!                              │
//!                              └─ set_value / bulk_modify_number
//!                                        │
//!                                        ▼
//!                               compute_changes ──▶ Change[] ──▶ CommandPack
//! ```

#[macro_use]
mod macros;
mod api;
mod compare;
mod engine;
mod error;
mod history;

use indexmap::IndexMap;

pub use api::{Options, ParseOutcome, parse, parse_chunked, parse_verbose_with, parse_with, try_parse_with};
pub use compare::{DiffKind, ParamDiff, compare_strategies, copy_params};
pub use engine::{
    Category, CategorySet, Change, CommandPack, DocumentBuilder, DuplicateCommand, LineKind, NumberMap, ParameterRow,
    ParseMetrics, ParseProgress, RowFilter, Separator, Step, Trigger, TriggerEntry, TriggerIndex, build_command_pack,
    build_rows, build_trigger_index, bulk_modify_number, classify, classify_line, compute_changes, dedupe_strategies,
    detect_duplicate_commands, detect_duplicate_strategies, detect_separator, extract_numbers, filter_rows,
    format_command, freeze_forward_baseline, freeze_revert_baseline, map_to_text, remove_strategies,
    reset_all_baselines, value_to_map,
};
pub use error::{Error, Result};
pub use history::{CommandTransport, DispatchReport, HistoryEntry, HistoryStore, MemoryHistory, dispatch};

/// Insertion-ordered parameter map (`key -> value`).
pub type ParamMap = IndexMap<String, String>;

/// Parameter holding the display name of a strategy.
pub const STRATEGY_NAME_KEY: &str = "StrategyName";

// --- Document model ---------------------------------------------------------

/// A named parameter set.
///
/// `original_params` is captured once when the strategy is built and never
/// changes afterwards. The two baselines are `None` until frozen, in which case
/// they fall back to the original snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Value of the `StrategyName` parameter, trimmed. Empty when absent.
    pub name: String,
    /// Comparison alias; used instead of `name` as the command target.
    pub alias: Option<String>,
    params: ParamMap,
    original_params: ParamMap,
    baseline_forward: Option<ParamMap>,
    baseline_revert: Option<ParamMap>,
}

impl Strategy {
    /// Build a strategy from its parsed parameters, snapshotting them as the original.
    pub fn from_params(params: ParamMap) -> Self {
        let name = params.get(STRATEGY_NAME_KEY).map(|v| v.trim().to_string()).unwrap_or_default();
        Strategy {
            name,
            alias: None,
            original_params: params.clone(),
            params,
            baseline_forward: None,
            baseline_revert: None,
        }
    }

    /// Current (possibly edited) parameters.
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Parameters exactly as parsed.
    pub fn original_params(&self) -> &ParamMap {
        &self.original_params
    }

    /// Current value of `param`, if present.
    pub fn value(&self, param: &str) -> Option<&str> {
        self.params.get(param).map(String::as_str)
    }

    /// Explicit forward snapshot, if one was frozen.
    pub fn baseline_forward(&self) -> Option<&ParamMap> {
        self.baseline_forward.as_ref()
    }

    /// Explicit revert snapshot, if one was frozen.
    pub fn baseline_revert(&self) -> Option<&ParamMap> {
        self.baseline_revert.as_ref()
    }

    /// Set or clear the comparison alias. Blank aliases are stored as `None`.
    pub fn set_alias(&mut self, alias: Option<&str>) {
        self.alias = alias.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string);
    }
}

/// A named, ordered group of strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub strategies: Vec<Strategy>,
}

/// Top-level entry of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Folder(Folder),
    Strategy(Strategy),
}

/// Address of a strategy inside a [`StrategyDocument`].
///
/// `item` indexes the top-level items; `strategy` indexes into the folder when
/// the item is a folder. Paths go stale when strategies are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrategyPath {
    pub item: usize,
    pub strategy: Option<usize>,
}

impl StrategyPath {
    pub fn top_level(item: usize) -> Self {
        StrategyPath { item, strategy: None }
    }

    pub fn in_folder(item: usize, strategy: usize) -> Self {
        StrategyPath { item, strategy: Some(strategy) }
    }
}

/// A strategy together with its address and containing folder.
#[derive(Debug, Clone, Copy)]
pub struct StrategyRef<'a> {
    pub path: StrategyPath,
    pub folder: Option<&'a str>,
    pub strategy: &'a Strategy,
}

/// Parsed forest of folders and bare strategies, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyDocument {
    items: Vec<Item>,
}

impl StrategyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate folders in document order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Folder(folder) => Some(folder),
            Item::Strategy(_) => None,
        })
    }

    /// Iterate every strategy (bare and nested) in document order.
    pub fn strategies(&self) -> impl Iterator<Item = StrategyRef<'_>> + '_ {
        self.items.iter().enumerate().flat_map(|(item_idx, item)| {
            let refs: Vec<StrategyRef<'_>> = match item {
                Item::Strategy(strategy) => {
                    vec![StrategyRef { path: StrategyPath::top_level(item_idx), folder: None, strategy }]
                }
                Item::Folder(folder) => folder
                    .strategies
                    .iter()
                    .enumerate()
                    .map(|(idx, strategy)| StrategyRef {
                        path: StrategyPath::in_folder(item_idx, idx),
                        folder: Some(folder.name.as_str()),
                        strategy,
                    })
                    .collect(),
            };
            refs
        })
    }

    /// Paths of every strategy in document order.
    pub fn paths(&self) -> Vec<StrategyPath> {
        self.strategies().map(|s| s.path).collect()
    }

    pub fn strategy_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                Item::Folder(folder) => folder.strategies.len(),
                Item::Strategy(_) => 1,
            })
            .sum()
    }

    pub fn strategy(&self, path: StrategyPath) -> Option<&Strategy> {
        match (self.items.get(path.item)?, path.strategy) {
            (Item::Strategy(strategy), None) => Some(strategy),
            (Item::Folder(folder), Some(idx)) => folder.strategies.get(idx),
            _ => None,
        }
    }

    pub fn strategy_mut(&mut self, path: StrategyPath) -> Option<&mut Strategy> {
        match (self.items.get_mut(path.item)?, path.strategy) {
            (Item::Strategy(strategy), None) => Some(strategy),
            (Item::Folder(folder), Some(idx)) => folder.strategies.get_mut(idx),
            _ => None,
        }
    }

    /// Apply `f` to every strategy in document order.
    pub(crate) fn for_each_strategy_mut(&mut self, mut f: impl FnMut(&mut Strategy)) {
        for item in &mut self.items {
            match item {
                Item::Strategy(strategy) => f(strategy),
                Item::Folder(folder) => folder.strategies.iter_mut().for_each(&mut f),
            }
        }
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}
