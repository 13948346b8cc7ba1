//! Strategy parsing, indexing and diff engine.
//!
//! The engine is split into focused submodules under `src/engine/`. Every
//! stage is a pure function of its inputs except the builder, which owns a
//! resumable scan so large inputs can be parsed in chunks.
//!
//! ## How the parts work together
//!
//! ```text
//! text ── classify_line ──▶ LineKind            (line.rs)
//!                              │
//!                              v
//!                     DocumentBuilder::step     (builder.rs)
//!                       - flush pending strategies
//!                       - merge folders by name
//!                       - yield every N lines on large input
//!                              │
//!                              v
//!                      StrategyDocument
//!                              │
//!          ┌───────────────────┼──────────────────────┐
//!          v                   v                      v
//!     build_rows          compute_changes      bulk_modify_number
//!     (index.rs)            (diff.rs)              (bulk.rs)
//!          │                   │
//!          v                   v
//!   build_trigger_index    CommandPack / duplicate detection
//! ```
//!
//! ## Responsibilities by module
//!
//! - `line.rs`: classifies one raw line (markers, `key=value`, comments).
//! - `builder.rs`: turns classified lines into folders and strategies.
//! - `classify.rs`: parameter categories, trigger-number extraction and the
//!   number-map codec used by bulk edits.
//! - `index.rs`: sorted parameter rows, the trigger index and row filters.
//! - `diff.rs`: baselines, change computation, command packs and dedup.
//! - `bulk.rs`: add/remove a trigger number across visible rows.
//! - `metrics.rs`: parse timing and progress counters.
//!
//! ## Debugging
//!
//! All stages emit `tracing` events under the `stratagem` target; the CLI
//! enables them through `STRATAGEM_LOG=debug`.

#[path = "engine/builder.rs"]
mod builder;
#[path = "engine/bulk.rs"]
mod bulk;
#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/diff.rs"]
mod diff;
#[path = "engine/index.rs"]
mod index;
#[path = "engine/line.rs"]
mod line;
#[path = "engine/metrics.rs"]
mod metrics;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use builder::{DocumentBuilder, Step};
pub use bulk::bulk_modify_number;
pub use classify::{
    Category, CategorySet, NumberMap, Separator, Trigger, classify, detect_separator, extract_numbers, map_to_text,
    value_to_map,
};
pub use diff::{
    Change, CommandPack, DuplicateCommand, build_command_pack, compute_changes, dedupe_strategies,
    detect_duplicate_commands, detect_duplicate_strategies, format_command, freeze_forward_baseline,
    freeze_revert_baseline, remove_strategies, reset_all_baselines,
};
pub use index::{ParameterRow, RowFilter, TriggerEntry, TriggerIndex, build_rows, build_trigger_index, filter_rows};
pub use line::{LineKind, classify_line};
pub use metrics::{ParseMetrics, ParseProgress};
