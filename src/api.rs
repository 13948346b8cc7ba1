use crate::engine::{DocumentBuilder, ParseMetrics, ParseProgress, Step};
use crate::error::{Error, Result};
use crate::StrategyDocument;
use std::time::Instant;

/// Options that affect parsing.
#[derive(Debug, Clone)]
pub struct Options {
    /// Inputs with more lines than this are parsed in chunks.
    pub chunk_threshold_lines: usize,
    /// Lines processed between two suspension points of a chunked parse.
    pub yield_every_lines: usize,
    /// Optional size guard checked by [`try_parse_with`].
    pub max_input_bytes: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self { chunk_threshold_lines: 2_000, yield_every_lines: 500, max_input_bytes: None }
    }
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub document: StrategyDocument,
    pub metrics: ParseMetrics,
}

/// Parse `text` with default [`Options`].
///
/// Never fails: malformed lines are skipped and unterminated blocks are
/// attached as they are. An empty string yields an empty document.
///
/// # Example
/// ```
/// use stratagem::parse;
///
/// let doc = parse("##Begin_Strategy\nStrategyName=Foo\nTriggerKeysBL=5,7\n##End_Strategy");
/// assert_eq!(doc.strategy_count(), 1);
/// ```
pub fn parse(text: &str) -> StrategyDocument {
    parse_with(text, &Options::default())
}

/// Parse `text` with the provided `options`, without suspending.
pub fn parse_with(text: &str, options: &Options) -> StrategyDocument {
    DocumentBuilder::new(text, options).run()
}

/// Parse `text`, calling `on_yield` at every suspension point.
///
/// Inputs above [`Options::chunk_threshold_lines`] suspend every
/// [`Options::yield_every_lines`] lines; the hook is where a host hands control
/// back to its event loop. The document is identical to [`parse_with`].
pub fn parse_chunked(text: &str, options: &Options, mut on_yield: impl FnMut(&ParseProgress)) -> StrategyDocument {
    let mut builder = DocumentBuilder::new(text, options);
    while let Step::Yield(progress) = builder.step() {
        on_yield(&progress);
    }
    builder.finish()
}

/// Parse `text`, rejecting inputs above [`Options::max_input_bytes`].
pub fn try_parse_with(text: &str, options: &Options) -> Result<StrategyDocument> {
    if let Some(limit) = options.max_input_bytes {
        if text.len() > limit {
            return Err(Error::InputTooLarge { size: text.len(), limit });
        }
    }
    Ok(parse_with(text, options))
}

/// Parse `text` and return timing and counters alongside the document.
pub fn parse_verbose_with(text: &str, options: &Options) -> ParseOutcome {
    let start = Instant::now();
    let mut builder = DocumentBuilder::new(text, options);
    let chunked = builder.is_chunked();
    let progress = loop {
        match builder.step() {
            Step::Yield(_) => continue,
            Step::Finished(progress) => break progress,
        }
    };
    let document = builder.finish();

    ParseOutcome { document, metrics: ParseMetrics { total: start.elapsed(), chunked, progress } }
}
