//! Baselines, change computation and command generation.
//!
//! Every strategy carries three views of its parameters:
//!
//! ```text
//! original_params    parse-time snapshot, never mutated
//! baseline_forward   Option<snapshot>; None -> original_params
//! baseline_revert    Option<snapshot>; None -> original_params
//! params             current, edited in place by set_value
//! ```
//!
//! A forward command moves a bot from the forward baseline to the current
//! value; a revert command moves it from the current value back to the revert
//! baseline. The two baselines are frozen independently, so an operator can
//! send only the newest edits forward while keeping the ability to revert all
//! the way to the parsed state.
//!
//! Commands have the fixed shape `SetParam "<target>" <param> <value>`.

use crate::{Item, ParamMap, STRATEGY_NAME_KEY, Strategy, StrategyDocument, StrategyPath};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Target written when a strategy has neither alias nor name.
const UNDEFINED_TARGET: &str = "UNDEFINED";

/// One parameter whose current value diverges from a baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: StrategyPath,
    pub target: String,
    pub param: String,
    /// Forward-baseline value; empty when the parameter is new.
    pub old_value: String,
    pub new_value: String,
    pub forward: Option<String>,
    pub revert: Option<String>,
}

/// Newline-joined forward and revert commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPack {
    pub forward: String,
    pub revert: String,
}

/// A command line that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCommand {
    pub command: String,
    pub count: usize,
}

impl Strategy {
    /// Overwrite `param` in the current parameters. Baselines are untouched.
    pub fn set_value(&mut self, param: &str, value: &str) {
        if param == STRATEGY_NAME_KEY {
            self.name = value.trim().to_string();
        }
        match self.params.get_mut(param) {
            Some(slot) => {
                slot.clear();
                slot.push_str(value);
            }
            None => {
                self.params.insert(param.to_string(), value.to_string());
            }
        }
    }

    /// Effective forward baseline.
    pub fn forward_baseline(&self) -> &ParamMap {
        self.baseline_forward.as_ref().unwrap_or(&self.original_params)
    }

    /// Effective revert baseline.
    pub fn revert_baseline(&self) -> &ParamMap {
        self.baseline_revert.as_ref().unwrap_or(&self.original_params)
    }

    /// Command target: the alias when set, else the name, else `UNDEFINED`.
    pub fn target(&self) -> &str {
        let target = self.alias.as_deref().filter(|a| !a.is_empty()).unwrap_or(&self.name);
        if target.is_empty() { UNDEFINED_TARGET } else { target }
    }

    /// Changes for this strategy, in parameter order.
    pub fn changes(&self, path: StrategyPath) -> Vec<Change> {
        let target = self.target();
        let forward_base = self.forward_baseline();
        let revert_base = self.revert_baseline();

        self.params
            .iter()
            .filter_map(|(param, value)| {
                let old = forward_base.get(param);
                let forward = (old != Some(value)).then(|| format_command(target, param, value));
                let revert = revert_base
                    .get(param)
                    .filter(|base| *base != value)
                    .map(|base| format_command(target, param, base));

                if forward.is_none() && revert.is_none() {
                    return None;
                }
                Some(Change {
                    path,
                    target: target.to_string(),
                    param: param.clone(),
                    old_value: old.cloned().unwrap_or_default(),
                    new_value: value.clone(),
                    forward,
                    revert,
                })
            })
            .collect()
    }

    fn forward_commands(&self) -> BTreeSet<String> {
        let target = self.target();
        let base = self.forward_baseline();
        self.params
            .iter()
            .filter(|(param, value)| base.get(*param) != Some(*value))
            .map(|(param, value)| format_command(target, param, value))
            .collect()
    }
}

impl StrategyDocument {
    /// Set a parameter on the strategy at `path`. Returns `false` for a stale path.
    pub fn set_value(&mut self, path: StrategyPath, param: &str, value: &str) -> bool {
        match self.strategy_mut(path) {
            Some(strategy) => {
                strategy.set_value(param, value);
                true
            }
            None => false,
        }
    }
}

/// Render one `SetParam` command.
pub fn format_command(target: &str, param: &str, value: &str) -> String {
    let target = if target.is_empty() { UNDEFINED_TARGET } else { target };
    format!("SetParam \"{target}\" {param} {value}")
}

/// Restore every strategy to its parsed state and drop both baselines.
pub fn reset_all_baselines(document: &mut StrategyDocument) {
    document.for_each_strategy_mut(|strategy| {
        strategy.params = strategy.original_params.clone();
        strategy.name = strategy.params.get(STRATEGY_NAME_KEY).map(|v| v.trim().to_string()).unwrap_or_default();
        strategy.baseline_forward = None;
        strategy.baseline_revert = None;
    });
}

/// Snapshot current values as the forward baseline.
pub fn freeze_forward_baseline(document: &mut StrategyDocument) {
    document.for_each_strategy_mut(|strategy| strategy.baseline_forward = Some(strategy.params.clone()));
}

/// Snapshot current values as the revert baseline.
pub fn freeze_revert_baseline(document: &mut StrategyDocument) {
    document.for_each_strategy_mut(|strategy| strategy.baseline_revert = Some(strategy.params.clone()));
}

/// Every change in the document, in document then parameter order.
pub fn compute_changes(document: &StrategyDocument) -> Vec<Change> {
    let changes: Vec<Change> = document.strategies().flat_map(|entry| entry.strategy.changes(entry.path)).collect();
    debug!(changes = changes.len(), "computed parameter changes");
    changes
}

/// Join the non-empty forward and revert commands, preserving order.
pub fn build_command_pack(changes: &[Change]) -> CommandPack {
    let forward: Vec<&str> = changes.iter().filter_map(|c| c.forward.as_deref()).collect();
    let revert: Vec<&str> = changes.iter().filter_map(|c| c.revert.as_deref()).collect();
    CommandPack { forward: forward.join("\n"), revert: revert.join("\n") }
}

/// Exact, case-sensitive duplicate lines in a forward command text.
///
/// Blank lines are ignored. Groups are sorted by descending count; equal
/// counts keep first-appearance order.
pub fn detect_duplicate_commands(forward_text: &str) -> Vec<DuplicateCommand> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in forward_text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let count = counts.entry(line).or_insert(0);
        if *count == 0 {
            order.push(line);
        }
        *count += 1;
    }

    let mut duplicates: Vec<DuplicateCommand> = order
        .into_iter()
        .filter_map(|line| {
            let count = counts.get(line).copied().unwrap_or(0);
            (count > 1).then(|| DuplicateCommand { command: line.to_string(), count })
        })
        .collect();
    duplicates.sort_by(|a, b| b.count.cmp(&a.count));
    duplicates
}

/// Strategies whose set of forward commands repeats an earlier strategy's.
///
/// The first occurrence in document order is kept; every later one is
/// returned. Comparison is by generated commands, so two strategies with
/// different untouched values but identical edits count as duplicates, and
/// unedited strategies (empty command sets) all match each other.
pub fn detect_duplicate_strategies(document: &StrategyDocument) -> Vec<StrategyPath> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in document.strategies() {
        if !seen.insert(entry.strategy.forward_commands()) {
            duplicates.push(entry.path);
        }
    }
    duplicates
}

/// Remove the strategies at `paths`; folders emptied by the removal are dropped.
///
/// Returns how many strategies were removed. Unknown paths are skipped.
pub fn remove_strategies(document: &mut StrategyDocument, paths: &[StrategyPath]) -> usize {
    let mut per_folder: HashMap<usize, BTreeSet<usize>> = HashMap::new();
    let mut dropped_items: BTreeSet<usize> = BTreeSet::new();
    let mut removed = 0usize;

    for path in paths {
        if document.strategy(*path).is_none() {
            continue;
        }
        match path.strategy {
            Some(idx) => {
                per_folder.entry(path.item).or_default().insert(idx);
            }
            None => {
                dropped_items.insert(path.item);
            }
        }
    }

    let items = document.items_mut();
    for (item_idx, indices) in per_folder {
        if let Some(Item::Folder(folder)) = items.get_mut(item_idx) {
            for idx in indices.into_iter().rev() {
                folder.strategies.remove(idx);
                removed += 1;
            }
            if folder.strategies.is_empty() {
                dropped_items.insert(item_idx);
            }
        }
    }

    for item_idx in dropped_items.into_iter().rev() {
        if matches!(items.get(item_idx), Some(Item::Strategy(_))) {
            removed += 1;
        }
        items.remove(item_idx);
    }

    debug!(removed, "removed strategies");
    removed
}

/// Detect and remove duplicate strategies. Returns how many were removed.
pub fn dedupe_strategies(document: &mut StrategyDocument) -> usize {
    let duplicates = detect_duplicate_strategies(document);
    remove_strategies(document, &duplicates)
}
