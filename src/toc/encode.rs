//! Outline text encoding.

use crate::error::Result;
use crate::label;
use crate::model::{OutlineEntry, PageLabelRule};

/// Encode page label rules and outline entries as outline text.
///
/// Label directive lines come first, one per rule in order, followed by one
/// line per entry in document order. Inputs are not modified.
pub fn encode_outline(entries: &[OutlineEntry], labels: &[PageLabelRule]) -> Result<String> {
    let mut lines = Vec::with_capacity(labels.len() + entries.len());
    for rule in labels {
        lines.push(encode_label_rule(rule)?);
    }
    for entry in entries {
        lines.push(encode_entry(entry));
    }
    Ok(lines.join("\n"))
}

/// Encode one entry as `"{indent}- {title}#{page}"`.
///
/// Indentation is two spaces per level above 1. Entries with an unresolved
/// page omit the `#page` suffix so the line decodes back to unresolved.
pub fn encode_entry(entry: &OutlineEntry) -> String {
    let indent = " ".repeat(entry.level.saturating_sub(1) as usize * 2);
    let title = entry.title.trim();
    if entry.has_page() {
        format!("{}- {}#{}", indent, title, entry.page)
    } else {
        format!("{}- {}", indent, title)
    }
}

/// Encode one label rule as `"@label {start}=[{prefix}]{numeral}"`.
///
/// `start` is the 1-based page the rule begins on; the brackets are omitted
/// when the prefix is empty.
pub fn encode_label_rule(rule: &PageLabelRule) -> Result<String> {
    let numeral = label::format_numeral(rule.style, rule.first_page_num)?;
    let start = rule.start_page + 1;
    if rule.prefix.is_empty() {
        Ok(format!("@label {}={}", start, numeral))
    } else {
        Ok(format!("@label {}=[{}]{}", start, rule.prefix, numeral))
    }
}
