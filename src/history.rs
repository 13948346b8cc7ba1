//! Seams to the collaborators that store and send generated commands.
//!
//! The engine never performs I/O. History storage and command transport are
//! traits implemented by the host; [`MemoryHistory`] is a plain in-memory
//! store for hosts without persistence.

use crate::Change;
use chrono::{DateTime, Utc};

/// A saved batch of changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Save time supplied by the caller.
    pub saved_at: DateTime<Utc>,
    pub changes: Vec<Change>,
}

/// Append-only store of saved change batches, addressed by index.
pub trait HistoryStore {
    fn append(&mut self, entry: HistoryEntry);
    fn entries(&self) -> &[HistoryEntry];
    /// Remove the entry at `index`, returning it when it existed.
    fn remove(&mut self, index: usize) -> Option<HistoryEntry>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }
}

/// Sends single command lines to a remote endpoint.
///
/// `Ok` and `Err` both carry the endpoint's response text.
pub trait CommandTransport {
    fn send(&mut self, target: &str, command: &str) -> Result<String, String>;
}

/// Outcome of one command line sent to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub target: String,
    pub command: String,
    pub outcome: Result<String, String>,
}

/// Send every non-blank line of `pack` to every target, in order.
pub fn dispatch<T: CommandTransport + ?Sized>(transport: &mut T, targets: &[&str], pack: &str) -> Vec<DispatchReport> {
    let commands: Vec<&str> = pack.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
    let mut reports = Vec::with_capacity(commands.len() * targets.len());
    for target in targets {
        for command in &commands {
            let outcome = transport.send(target, command);
            if let Err(reason) = &outcome {
                tracing::warn!(endpoint = %target, command = %command, reason = %reason, "command rejected");
            }
            reports.push(DispatchReport { target: target.to_string(), command: command.to_string(), outcome });
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_command_pack, compute_changes, parse};
    use chrono::TimeZone;

    struct Recorder {
        sent: Vec<(String, String)>,
    }

    impl CommandTransport for Recorder {
        fn send(&mut self, target: &str, command: &str) -> Result<String, String> {
            self.sent.push((target.to_string(), command.to_string()));
            if target == "down" { Err("timeout".to_string()) } else { Ok("ok".to_string()) }
        }
    }

    #[test]
    fn history_append_and_remove_by_index() {
        let mut doc = parse("##Begin_Strategy\nStrategyName=Foo\nA=1\n##End_Strategy");
        let path = doc.paths()[0];
        doc.set_value(path, "A", "2");

        let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut history = MemoryHistory::default();
        history.append(HistoryEntry { saved_at, changes: compute_changes(&doc) });
        history.append(HistoryEntry { saved_at, changes: Vec::new() });

        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.remove(5), None);
        let removed = history.remove(0).unwrap();
        assert_eq!(removed.changes.len(), 1);
        assert!(history.entries()[0].changes.is_empty());
    }

    #[test]
    fn dispatch_sends_each_line_to_each_target() {
        let mut doc = parse("##Begin_Strategy\nStrategyName=Foo\nA=1\nB=1\n##End_Strategy");
        let path = doc.paths()[0];
        doc.set_value(path, "A", "2");
        doc.set_value(path, "B", "2");
        let pack = build_command_pack(&compute_changes(&doc));

        let mut transport = Recorder { sent: Vec::new() };
        let reports = dispatch(&mut transport, &["bot-1", "down"], &format!("{}\n\n", pack.forward));

        assert_eq!(reports.len(), 4);
        assert_eq!(transport.sent[0], ("bot-1".to_string(), "SetParam \"Foo\" A 2".to_string()));
        assert_eq!(reports[3].outcome, Err("timeout".to_string()));
        assert!(reports[..2].iter().all(|r| r.outcome.is_ok()));
    }
}
