//! Parse metrics.
//!
//! Small counters used to observe a parse run:
//!
//! - [`ParseProgress`] is reported at every suspension point of a chunked
//!   parse and when the scan completes.
//! - [`ParseMetrics`] bundles the final progress with wall-clock timing for
//!   [`crate::parse_verbose_with`].
//!
//! Counters are cheap and always collected; timing is only taken by the
//! verbose entry point.

use std::time::Duration;

/// Progress of a (possibly chunked) parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseProgress {
    /// Raw lines consumed so far.
    pub lines: usize,
    /// Strategies attached so far (bare or inside a folder).
    pub strategies: usize,
    /// Distinct folders attached so far (merged folders count once).
    pub folders: usize,
    /// Parameter lines stored into strategies.
    pub params: usize,
    /// Number of times the scan suspended.
    pub yields: usize,
}

/// Timing and counters for a finished parse.
#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    /// Total elapsed time for the parse.
    pub total: Duration,
    /// Whether the input crossed the chunking threshold.
    pub chunked: bool,
    /// Final counters.
    pub progress: ParseProgress,
}
