//! Document builder.
//!
//! Consumes classified lines and assembles the folder/strategy forest. The scan
//! is forgiving: a missing `##End_Strategy` is closed by the next open marker,
//! and blocks left open at end-of-input are attached as-is.
//!
//! ## State
//!
//! ```text
//! folder:  Option<Folder>                 open folder, if any
//! pending: Option<Vec<(key, value)>>      open strategy body, if any
//! slots:   folder name -> item index      for merging same-named folders
//! ```
//!
//! ## Cooperative chunking
//!
//! [`DocumentBuilder`] is a resumable state machine. When the input has more
//! lines than [`Options::chunk_threshold_lines`], every call to
//! [`DocumentBuilder::step`] consumes at most
//! [`Options::yield_every_lines`] lines and then returns [`Step::Yield`], giving
//! the caller a chance to run its own event loop. Small inputs finish in one
//! step. Where the scan suspends never changes the resulting document.

use super::metrics::ParseProgress;
use crate::api::Options;
use crate::engine::line::{LineKind, classify_line};
use crate::{Folder, Item, ParamMap, Strategy, StrategyDocument};
use std::collections::HashMap;
use std::str::Lines;
use tracing::{debug, trace};

/// Outcome of one [`DocumentBuilder::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The scan suspended after a chunk; call `step` again to continue.
    Yield(ParseProgress),
    /// All input consumed; take the result with [`DocumentBuilder::finish`].
    Finished(ParseProgress),
}

/// Resumable builder for a [`StrategyDocument`].
///
/// Usage: `DocumentBuilder::new(text, &options)`, call [`step`](Self::step)
/// until it returns [`Step::Finished`], then [`finish`](Self::finish).
#[derive(Debug)]
pub struct DocumentBuilder<'a> {
    lines: Lines<'a>,
    /// Lines per chunk; `None` scans everything in one step.
    chunk: Option<usize>,
    folder: Option<Folder>,
    pending: Option<Vec<(&'a str, &'a str)>>,
    slots: HashMap<String, usize>,
    document: StrategyDocument,
    progress: ParseProgress,
    done: bool,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(text: &'a str, options: &Options) -> Self {
        let chunked = text.lines().nth(options.chunk_threshold_lines).is_some();
        let chunk = if chunked { Some(options.yield_every_lines.max(1)) } else { None };

        DocumentBuilder {
            lines: text.lines(),
            chunk,
            folder: None,
            pending: None,
            slots: HashMap::new(),
            document: StrategyDocument::new(),
            progress: ParseProgress::default(),
            done: false,
        }
    }

    /// Whether this builder suspends between chunks.
    pub fn is_chunked(&self) -> bool {
        self.chunk.is_some()
    }

    pub fn progress(&self) -> ParseProgress {
        self.progress
    }

    /// Process the next chunk of lines.
    pub fn step(&mut self) -> Step {
        if self.done {
            return Step::Finished(self.progress);
        }

        let budget = self.chunk.unwrap_or(usize::MAX);
        let mut consumed = 0usize;
        while consumed < budget {
            match self.lines.next() {
                Some(line) => {
                    self.feed(line);
                    consumed += 1;
                }
                None => {
                    self.finish_input();
                    return Step::Finished(self.progress);
                }
            }
        }

        self.progress.yields += 1;
        debug!(lines = self.progress.lines, strategies = self.progress.strategies, "parse chunk yielded");
        Step::Yield(self.progress)
    }

    /// Run to completion (ignoring suspension points) and return the document.
    pub fn run(mut self) -> StrategyDocument {
        while let Step::Yield(_) = self.step() {}
        self.finish()
    }

    /// Consume the builder, flushing anything still open.
    pub fn finish(mut self) -> StrategyDocument {
        self.finish_input();
        self.document
    }

    fn feed(&mut self, line: &'a str) {
        self.progress.lines += 1;

        match classify_line(line) {
            LineKind::FolderOpen(name) => {
                self.flush_strategy();
                if let Some(previous) = self.folder.take() {
                    trace!(folder = %previous.name, "folder left open before next folder");
                    self.attach_folder(previous);
                }
                self.folder = Some(Folder { name: name.to_string(), strategies: Vec::new() });
            }
            LineKind::FolderClose => {
                self.flush_strategy();
                if let Some(folder) = self.folder.take() {
                    self.attach_folder(folder);
                }
            }
            LineKind::StrategyOpen => {
                self.flush_strategy();
                self.pending = Some(Vec::new());
            }
            LineKind::StrategyClose => self.flush_strategy(),
            LineKind::Param { key, value } => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.push((key, value));
                }
            }
            LineKind::Ignored => {}
        }
    }

    fn finish_input(&mut self) {
        if self.done {
            return;
        }
        self.flush_strategy();
        if let Some(folder) = self.folder.take() {
            trace!(folder = %folder.name, "attaching unterminated folder at end of input");
            self.attach_folder(folder);
        }
        self.done = true;
        debug!(
            lines = self.progress.lines,
            folders = self.progress.folders,
            strategies = self.progress.strategies,
            yields = self.progress.yields,
            "parse finished"
        );
    }

    fn flush_strategy(&mut self) {
        let Some(lines) = self.pending.take() else {
            return;
        };

        let mut params = ParamMap::with_capacity(lines.len());
        for (key, value) in lines {
            params.insert(key.to_string(), value.to_string());
        }
        self.progress.params += params.len();
        self.progress.strategies += 1;

        let strategy = Strategy::from_params(params);
        match self.folder.as_mut() {
            Some(folder) => folder.strategies.push(strategy),
            None => self.document.items_mut().push(Item::Strategy(strategy)),
        }
    }

    fn attach_folder(&mut self, folder: Folder) {
        let items = self.document.items_mut();
        if let Some(&slot) = self.slots.get(&folder.name) {
            if let Some(Item::Folder(existing)) = items.get_mut(slot) {
                trace!(folder = %folder.name, added = folder.strategies.len(), "merged duplicate folder");
                existing.strategies.extend(folder.strategies);
                return;
            }
        }

        self.slots.insert(folder.name.clone(), items.len());
        items.push(Item::Folder(folder));
        self.progress.folders += 1;
    }
}
