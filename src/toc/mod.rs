//! Outline text codec.
//!
//! Converts between outline entries plus page label rules and the indented
//! outline text format:
//!
//! ```text
//! @label 1=[A-]i
//! - Chapter 1#1
//!   - Section 1.1#2
//! #+5
//! - Chapter 2#10
//! ```
//!
//! Entry lines carry a nesting level (two spaces of indentation per level on
//! encode), a title, and an optional `#page` destination. Directive lines
//! (`@label`, `#±N`, `#A=B`) are metadata, not outline entries.

mod decode;
mod encode;

pub use decode::{decode_outline, DecodedOutline};
pub use encode::{encode_entry, encode_label_rule, encode_outline};

use regex::Regex;

/// Heuristic used when harvesting an outline from body text: recognizes
/// numbered chapter headings (`第 N 章 …`).
pub fn is_outline_heading(text: &str) -> bool {
    let heading = Regex::new(r"^第\s*\d+\s*章.+").unwrap();
    heading.is_match(text)
}
