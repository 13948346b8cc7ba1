//! Parameter classification and trigger-number extraction.
//!
//! A parameter's [`Category`] is a pure function of its name, looked up in a
//! fixed table. Indexed categories carry trigger numbers inside their values:
//!
//! ```text
//! TriggerKey=12 launch         Launch  -> [12]       (first integer anywhere)
//! TriggerKeysBL=5, 7=30;9      BL      -> [5, 7, 9]  (tokenized list)
//! TriggerSeconds=30            Seconds -> []         (never contributes)
//! ```
//!
//! List values are also decoded into a [`NumberMap`] (`number -> Trigger`) so
//! bulk edits can add or remove a number and write the value back in the same
//! separator style.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Semantic role of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Key this strategy raises when it fires.
    Launch,
    /// Keys that activate this strategy.
    ByKey,
    /// Keys that block this strategy.
    BL,
    /// Keys that make this strategy sell.
    Sell,
    /// Keys cleared when this strategy fires.
    Clear,
    /// Timing for trigger keys; carries no numbers.
    Seconds,
    Other,
}

impl Category {
    /// Ordering rank used for row grouping. `BL`, `Sell` and `Clear` share a rank.
    pub fn rank(self) -> u8 {
        match self {
            Category::Launch => 0,
            Category::ByKey => 1,
            Category::BL | Category::Sell | Category::Clear => 2,
            Category::Seconds => 3,
            Category::Other => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Launch => "launch",
            Category::ByKey => "by-key",
            Category::BL => "bl",
            Category::Sell => "sell",
            Category::Clear => "clear",
            Category::Seconds => "seconds",
            Category::Other => "other",
        }
    }

    /// Whether rows are produced for this category.
    pub fn is_indexed(self) -> bool {
        self != Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Set of categories, used to target bulk edits and filter rows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategorySet: u8 {
        const LAUNCH  = 1 << 0;
        const BY_KEY  = 1 << 1;
        const BL      = 1 << 2;
        const SELL    = 1 << 3;
        const CLEAR   = 1 << 4;
        const SECONDS = 1 << 5;
        const OTHER   = 1 << 6;

        /// Categories whose values are plain trigger-number lists.
        const LISTS = Self::BL.bits() | Self::SELL.bits() | Self::CLEAR.bits();
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        CategorySet::empty()
    }
}

impl CategorySet {
    pub fn contains_category(self, category: Category) -> bool {
        self.contains(CategorySet::from(category))
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        match category {
            Category::Launch => CategorySet::LAUNCH,
            Category::ByKey => CategorySet::BY_KEY,
            Category::BL => CategorySet::BL,
            Category::Sell => CategorySet::SELL,
            Category::Clear => CategorySet::CLEAR,
            Category::Seconds => CategorySet::SECONDS,
            Category::Other => CategorySet::OTHER,
        }
    }
}

/// Parameter name -> category.
static CATEGORY_TABLE: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    HashMap::from([
        ("TriggerKey", Category::Launch),
        ("TriggerByKey", Category::ByKey),
        ("TriggerByAllKeys", Category::ByKey),
        ("TriggerKeysBL", Category::BL),
        ("TriggerKeyBL", Category::BL),
        ("TriggerKeysSell", Category::Sell),
        ("SellByTriggerKeys", Category::Sell),
        ("TriggerKeysClear", Category::Clear),
        ("ClearTriggerKeys", Category::Clear),
        ("TriggerSeconds", Category::Seconds),
        ("TriggerKeySeconds", Category::Seconds),
    ])
});

/// Classify a parameter by name. Unknown names are [`Category::Other`].
pub fn classify(name: &str) -> Category {
    CATEGORY_TABLE.get(name).copied().unwrap_or(Category::Other)
}

/// Payload attached to a trigger number inside a list value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Bare number (`7`).
    Present,
    /// Number with a seconds suffix (`7=30`).
    Seconds(u32),
}

/// Ordered `number -> Trigger` map decoded from a list value.
pub type NumberMap = IndexMap<u32, Trigger>;

/// Separator style of a list value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Separator {
    #[default]
    Space,
    Comma,
    Semicolon,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Comma => ",",
            Separator::Semicolon => ";",
        }
    }
}

fn is_list_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';'
}

fn list_tokens(value: &str) -> impl Iterator<Item = &str> + '_ {
    value.split(is_list_separator).filter(|token| !token.is_empty())
}

/// Parse one list token (`7` or `7=30`). Malformed or overflowing tokens yield `None`.
fn parse_token(token: &str) -> Option<(u32, Trigger)> {
    let caps = regex!(r"^([0-9]+)(?:=([0-9]+))?$").captures(token)?;
    let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let trigger = match caps.get(2) {
        Some(seconds) => Trigger::Seconds(seconds.as_str().parse::<u32>().ok()?),
        None => Trigger::Present,
    };
    Some((number, trigger))
}

/// Extract the trigger numbers referenced by `value`.
///
/// - `Launch`: the first integer anywhere in the value.
/// - `Seconds` / `Other`: nothing.
/// - list categories: every well-formed token's leading integer, deduplicated
///   in first-seen order.
pub fn extract_numbers(value: &str, category: Category) -> Vec<u32> {
    match category {
        Category::Launch => regex!(r"[0-9]+")
            .find(value)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .into_iter()
            .collect(),
        Category::Seconds | Category::Other => Vec::new(),
        Category::ByKey | Category::BL | Category::Sell | Category::Clear => {
            value_to_map(value).keys().copied().collect()
        }
    }
}

/// Decode a list value. The first occurrence of a number keeps its position
/// and payload; later duplicates and malformed tokens are skipped.
pub fn value_to_map(value: &str) -> NumberMap {
    let mut map = NumberMap::new();
    for (number, trigger) in list_tokens(value).filter_map(parse_token) {
        map.entry(number).or_insert(trigger);
    }
    map
}

/// Encode a number map with `sep` between entries.
pub fn map_to_text(map: &NumberMap, sep: Separator) -> String {
    map.iter()
        .map(|(number, trigger)| match trigger {
            Trigger::Present => number.to_string(),
            Trigger::Seconds(seconds) => format!("{number}={seconds}"),
        })
        .collect::<Vec<_>>()
        .join(sep.as_str())
}

/// Separator style already used by `value`: the first separator character
/// found, or [`Separator::Space`] when there is none.
pub fn detect_separator(value: &str) -> Separator {
    value
        .chars()
        .find_map(|c| match c {
            ',' => Some(Separator::Comma),
            ';' => Some(Separator::Semicolon),
            c if c.is_whitespace() => Some(Separator::Space),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classify_is_a_fixed_lookup() {
        assert_eq!(classify("TriggerKey"), Category::Launch);
        assert_eq!(classify("TriggerByKey"), Category::ByKey);
        assert_eq!(classify("TriggerKeysBL"), Category::BL);
        assert_eq!(classify("TriggerKeysSell"), Category::Sell);
        assert_eq!(classify("ClearTriggerKeys"), Category::Clear);
        assert_eq!(classify("TriggerSeconds"), Category::Seconds);
        assert_eq!(classify("StrategyName"), Category::Other);
        assert_eq!(classify("triggerkey"), Category::Other);
    }

    #[test]
    fn launch_takes_first_integer_anywhere() {
        assert_eq!(extract_numbers("key 12 then 14", Category::Launch), vec![12]);
        assert_eq!(extract_numbers("12=30", Category::Launch), vec![12]);
        assert!(extract_numbers("none", Category::Launch).is_empty());
        assert!(extract_numbers("99999999999", Category::Launch).is_empty());
    }

    #[test]
    fn lists_skip_malformed_tokens_and_collapse_duplicates() {
        assert_eq!(extract_numbers("5, 7=30;9 5 x 3-4 =2 8=", Category::BL), vec![5, 7, 9]);
        assert_eq!(extract_numbers("1\t2\n3", Category::ByKey), vec![1, 2, 3]);
        assert!(extract_numbers("30", Category::Seconds).is_empty());
        assert!(extract_numbers("30", Category::Other).is_empty());
    }

    #[test]
    fn value_map_keeps_first_occurrence() {
        let map = value_to_map("5=10 7 5");
        assert_eq!(map.get(&5), Some(&Trigger::Seconds(10)));
        assert_eq!(map.get(&7), Some(&Trigger::Present));
        assert_eq!(map_to_text(&map, Separator::Comma), "5=10,7");
    }

    #[test]
    fn separator_follows_the_first_one_found() {
        assert_eq!(detect_separator("5,7 9"), Separator::Comma);
        assert_eq!(detect_separator("5;7,9"), Separator::Semicolon);
        assert_eq!(detect_separator("5 7"), Separator::Space);
        assert_eq!(detect_separator("5"), Separator::Space);
        assert_eq!(detect_separator(""), Separator::Space);
    }

    #[test]
    fn category_sets() {
        assert!(CategorySet::LISTS.contains_category(Category::Sell));
        assert!(!CategorySet::LISTS.contains_category(Category::Launch));
        assert_eq!(CategorySet::from(Category::Seconds), CategorySet::SECONDS);
        assert!(Category::Launch.rank() < Category::ByKey.rank());
        assert_eq!(Category::BL.rank(), Category::Clear.rank());
    }

    proptest! {
        #[test]
        fn number_map_normalization_is_idempotent(value in "[0-9=,; x]{0,40}") {
            let map = value_to_map(&value);
            for sep in [Separator::Space, Separator::Comma, Separator::Semicolon] {
                let text = map_to_text(&map, sep);
                prop_assert_eq!(value_to_map(&text), map.clone());
                prop_assert_eq!(map_to_text(&value_to_map(&text), sep), text);
            }
        }
    }
}
