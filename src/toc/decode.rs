//! Outline text decoding.
//!
//! Each line is matched against the grammars in a fixed precedence order:
//! entry with page, entry without page, page-gap directive, page-anchor
//! directive, label directive, blank. The first non-blank line matching
//! nothing aborts the whole decode; no partial outline is ever returned.

use crate::error::{Error, Result};
use crate::label;
use crate::model::{OutlineEntry, PageLabelRule};
use regex::Regex;

/// Result of decoding outline text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedOutline {
    /// Outline entries in document order
    pub entries: Vec<OutlineEntry>,

    /// Page label rules in directive order
    pub labels: Vec<PageLabelRule>,
}

/// Compiled line grammars, in precedence order.
struct Grammar {
    entry_with_page: Regex,
    entry_bare: Regex,
    gap: Regex,
    anchor: Regex,
    label: Regex,
}

impl Grammar {
    fn new() -> Self {
        Self {
            entry_with_page: Regex::new(r"^( *)[-+] (.+?)\s*#\s*(\d+)\s*$").unwrap(),
            entry_bare: Regex::new(r"^( *)[-+] ([^#]+?)\s*$").unwrap(),
            gap: Regex::new(r"^\s*#\s*([+-]\d+)\s*$").unwrap(),
            anchor: Regex::new(r"^\s*#\s*(\d+)\s*=\s*(-?\d+)\s*$").unwrap(),
            label: Regex::new(r"^@label\s+(\d+)\s*=\s*(?:[\[【（(](.*?)[\]】）)])?\s*([\w\-]+)\s*$")
                .unwrap(),
        }
    }
}

/// Parser state threaded through the per-line transition function.
///
/// `indent_step` is established by the first indentation increase and reused
/// for later dedents; `page_gap` shifts every explicit page decoded after the
/// directive that set it.
#[derive(Debug, Clone, Copy, Default)]
struct ParserState {
    level: u32,
    last_indent: usize,
    indent_step: usize,
    page_gap: i32,
    started: bool,
}

impl ParserState {
    /// Advance the state for a structural line with the given indentation
    /// width, returning the entry level for that line.
    ///
    /// Dedents drop `floor(delta / indent_step)` levels; a delta that is not
    /// an exact multiple of the established step truncates, and the level is
    /// clamped to 1.
    fn enter_entry(&mut self, indent: usize) -> u32 {
        if !self.started {
            self.started = true;
            self.level = 1;
            self.indent_step = 2;
        } else if indent > self.last_indent {
            self.indent_step = indent - self.last_indent;
            self.level += 1;
        } else if indent < self.last_indent {
            let dropped = ((self.last_indent - indent) / self.indent_step) as u32;
            self.level = self.level.saturating_sub(dropped).max(1);
        }
        self.last_indent = indent;
        self.level
    }
}

/// Decode outline text into entries and page label rules.
///
/// Fails with [`Error::Format`] on the first unrecognized non-blank line and
/// with [`Error::LabelRule`] on an unclassifiable label numeral; in both
/// cases nothing is returned.
pub fn decode_outline(text: &str) -> Result<DecodedOutline> {
    let grammar = Grammar::new();
    let mut state = ParserState::default();
    let mut decoded = DecodedOutline::default();

    for (lineno, line) in text.lines().enumerate() {
        if let Some(caps) = grammar.entry_with_page.captures(line) {
            let level = state.enter_entry(caps[1].len());
            let page: i32 = caps[3]
                .parse()
                .map_err(|_| Error::Format(format!("line {}: {}", lineno + 1, line)))?;
            decoded
                .entries
                .push(OutlineEntry::new(level, &caps[2], page + state.page_gap));
        } else if let Some(caps) = grammar.entry_bare.captures(line) {
            let level = state.enter_entry(caps[1].len());
            decoded.entries.push(OutlineEntry::unresolved(level, &caps[2]));
        } else if let Some(caps) = grammar.gap.captures(line) {
            let delta: i32 = caps[1]
                .parse()
                .map_err(|_| Error::Format(format!("line {}: {}", lineno + 1, line)))?;
            state.page_gap += delta;
            log::debug!("page gap adjusted by {delta} to {}", state.page_gap);
        } else if let Some(caps) = grammar.anchor.captures(line) {
            let anchor: i32 = caps[1]
                .parse()
                .map_err(|_| Error::Format(format!("line {}: {}", lineno + 1, line)))?;
            let target: i32 = caps[2]
                .parse()
                .map_err(|_| Error::Format(format!("line {}: {}", lineno + 1, line)))?;
            state.page_gap = target - anchor;
            log::debug!("page gap anchored to {}", state.page_gap);
        } else if let Some(caps) = grammar.label.captures(line) {
            let start: u32 = caps[1]
                .parse()
                .map_err(|_| Error::Format(format!("line {}: {}", lineno + 1, line)))?;
            let prefix = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let (style, first_page_num) = label::classify_numeral(&caps[3])?;
            decoded.labels.push(PageLabelRule::new(
                start.saturating_sub(1),
                prefix,
                style,
                first_page_num,
            ));
        } else if !line.trim().is_empty() {
            return Err(Error::Format(format!("line {}: {}", lineno + 1, line)));
        }
    }
    Ok(decoded)
}
