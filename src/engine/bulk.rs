//! Bulk trigger-number edits over the visible rows.

use super::classify::{CategorySet, Trigger, detect_separator, map_to_text, value_to_map};
use super::index::ParameterRow;
use crate::{StrategyDocument, StrategyPath};
use std::collections::HashSet;
use tracing::debug;

/// Add or remove `number` in every visible list parameter.
///
/// Only `BL`, `Sell` and `Clear` rows are touched, plus `Launch` rows when
/// `include_launch` is set. Values are read from `document` (not from the
/// possibly stale rows), re-encoded in their existing separator style and
/// written back with `set_value`.
///
/// When adding, `seconds` produces `number=seconds`; without it the number is
/// added bare and an existing entry is left as it is.
///
/// Values whose number set is unaffected are left byte-for-byte as they are.
/// Returns how many parameters actually changed text.
pub fn bulk_modify_number(
    document: &mut StrategyDocument,
    visible_rows: &[ParameterRow],
    number: u32,
    seconds: Option<u32>,
    add: bool,
    include_launch: bool,
) -> usize {
    let mut targets = CategorySet::LISTS;
    if include_launch {
        targets |= CategorySet::LAUNCH;
    }

    let mut visited: HashSet<(StrategyPath, &str)> = HashSet::new();
    let mut changed = 0usize;

    for row in visible_rows {
        if !targets.contains_category(row.category) || !visited.insert((row.path, row.param.as_str())) {
            continue;
        }
        let Some(strategy) = document.strategy_mut(row.path) else {
            continue;
        };
        let Some(current) = strategy.value(&row.param) else {
            continue;
        };

        let mut map = value_to_map(current);
        let touched = if add {
            let trigger = seconds.map_or(Trigger::Present, Trigger::Seconds);
            match map.get(&number) {
                None => map.insert(number, trigger).is_none(),
                Some(&existing) if seconds.is_some() && existing != trigger => {
                    map.insert(number, trigger);
                    true
                }
                Some(_) => false,
            }
        } else {
            map.shift_remove(&number).is_some()
        };
        // Untouched values keep their exact text, malformed tokens included.
        if !touched {
            continue;
        }

        let updated = map_to_text(&map, detect_separator(current));
        if updated != current {
            strategy.set_value(&row.param, &updated);
            changed += 1;
        }
    }

    debug!(number, add, changed, "bulk trigger edit");
    changed
}
