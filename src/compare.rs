//! Side-by-side strategy comparison.
//!
//! Used by the comparator tool: list the parameters two strategies disagree
//! on, and copy selected values from one to the other through the regular
//! edit path so the diff engine picks them up.

use crate::Strategy;

/// How a parameter differs between two strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Changed,
    OnlyLeft,
    OnlyRight,
}

/// One differing parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDiff {
    pub param: String,
    pub left: Option<String>,
    pub right: Option<String>,
    pub kind: DiffKind,
}

/// Parameters whose current values differ, left keys first, then keys only
/// present on the right. Equal values are omitted.
pub fn compare_strategies(left: &Strategy, right: &Strategy) -> Vec<ParamDiff> {
    let mut diffs = Vec::new();

    for (param, value) in left.params() {
        match right.value(param) {
            Some(other) if other == value => {}
            Some(other) => diffs.push(ParamDiff {
                param: param.clone(),
                left: Some(value.clone()),
                right: Some(other.to_string()),
                kind: DiffKind::Changed,
            }),
            None => diffs.push(ParamDiff {
                param: param.clone(),
                left: Some(value.clone()),
                right: None,
                kind: DiffKind::OnlyLeft,
            }),
        }
    }

    for (param, value) in right.params() {
        if left.value(param).is_none() {
            diffs.push(ParamDiff {
                param: param.clone(),
                left: None,
                right: Some(value.clone()),
                kind: DiffKind::OnlyRight,
            });
        }
    }

    diffs
}

/// Copy `names` from `from` into `to`. Returns how many values changed.
///
/// Names missing on `from` are skipped.
pub fn copy_params(from: &Strategy, to: &mut Strategy, names: &[&str]) -> usize {
    let mut changed = 0;
    for name in names {
        let Some(value) = from.value(name) else {
            continue;
        };
        if to.value(name) != Some(value) {
            to.set_value(name, value);
            changed += 1;
        }
    }
    changed
}
