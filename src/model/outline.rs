//! Outline and page label model types.

use serde::{Deserialize, Serialize};

/// One heading in a document's table of contents.
///
/// Entries are kept in document order; `level` starts at 1 for top-level
/// headings and never decreases below 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Heading title
    pub title: String,

    /// Destination page (1-indexed), or [`OutlineEntry::PAGE_UNRESOLVED`]
    pub page: i32,
}

impl OutlineEntry {
    /// Sentinel page value for entries whose destination is unknown.
    pub const PAGE_UNRESOLVED: i32 = -1;

    /// Create a new entry.
    pub fn new(level: u32, title: impl Into<String>, page: i32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }

    /// Create an entry with an unresolved destination page.
    pub fn unresolved(level: u32, title: impl Into<String>) -> Self {
        Self::new(level, title, Self::PAGE_UNRESOLVED)
    }

    /// Whether this entry has a resolved destination page.
    pub fn has_page(&self) -> bool {
        self.page > 0
    }
}

/// Page numbering style used by a [`PageLabelRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// No numeral; the label is the prefix alone
    #[default]
    None,
    /// Arabic digits
    Decimal,
    /// Uppercase letters (A, B, ..., AA)
    UpperAlpha,
    /// Lowercase letters (a, b, ..., aa)
    LowerAlpha,
    /// Uppercase Roman numerals
    UpperRoman,
    /// Lowercase Roman numerals
    LowerRoman,
}

/// A rule remapping physical page indices to displayed labels.
///
/// A document carries an ordered list of rules; each governs all pages from
/// `start_page` up to the next rule's start page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLabelRule {
    /// First physical page the rule applies to (0-based)
    pub start_page: u32,

    /// Literal prefix prepended to every label under this rule
    pub prefix: String,

    /// Numbering style
    pub style: LabelStyle,

    /// Value the numbering starts from (≥ 1)
    pub first_page_num: u32,
}

impl PageLabelRule {
    /// Create a new rule.
    pub fn new(
        start_page: u32,
        prefix: impl Into<String>,
        style: LabelStyle,
        first_page_num: u32,
    ) -> Self {
        Self {
            start_page,
            prefix: prefix.into(),
            style,
            first_page_num,
        }
    }
}
