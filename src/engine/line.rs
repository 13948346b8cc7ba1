//! Line classification (input pre-tokenization).
//!
//! The strategy grammar is line oriented. Each raw line is classified on its
//! own, without context, into one of the shapes below; the builder is the only
//! place that tracks nesting.
//!
//! ```text
//! #Begin_Folder Scalpers      -> FolderOpen("Scalpers")
//! ##Begin_Strategy            -> StrategyOpen
//! StrategyName=Foo            -> Param { key: "StrategyName", value: "Foo" }
//! ##End_Strategy              -> StrategyClose
//! #End_Folder                 -> FolderClose
//! // anything, ; anything     -> Ignored
//! ```
//!
//! ## Design notes
//!
//! - Markers are matched case-insensitively and accept one or two leading `#`.
//!   Any other line starting with `#` is a comment.
//! - A folder name may be written as `#Begin_Folder=Name` or `#Begin_Folder: Name`.
//! - Lines without `=` (or with an empty key) carry no parameter and are ignored.

/// Shape of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    FolderOpen(&'a str),
    FolderClose,
    StrategyOpen,
    StrategyClose,
    Param { key: &'a str, value: &'a str },
    Ignored,
}

/// Classify one raw line. Never fails; unknown shapes are [`LineKind::Ignored`].
pub fn classify_line(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") || line.starts_with(';') {
        return LineKind::Ignored;
    }
    if line.starts_with('#') {
        return classify_marker(line);
    }

    match line.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() { LineKind::Ignored } else { LineKind::Param { key, value: value.trim() } }
        }
        None => LineKind::Ignored,
    }
}

fn classify_marker(line: &str) -> LineKind<'_> {
    if let Some(caps) = regex!(r"(?i)^#{1,2}\s*begin_folder\b\s*[=:]?(.*)$").captures(line) {
        let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        return LineKind::FolderOpen(name);
    }
    if regex!(r"(?i)^#{1,2}\s*end_folder\b").is_match(line) {
        return LineKind::FolderClose;
    }
    if regex!(r"(?i)^#{1,2}\s*begin_strategy\b").is_match(line) {
        return LineKind::StrategyOpen;
    }
    if regex!(r"(?i)^#{1,2}\s*end_strategy\b").is_match(line) {
        return LineKind::StrategyClose;
    }
    LineKind::Ignored
}
