//! # tocmark
//!
//! Outline and markup annotation interchange for PDF documents.
//!
//! This library converts a document's outline (table of contents) and its
//! markup annotations between an in-memory geometric model and two textual
//! representations: a compact indented-text outline format and an XFDF-like
//! XML schema for annotations. Both codecs are exactly reversible for
//! well-formed input, including the coordinate flip between native
//! (bottom-left origin) page space and interchange (top-left origin) space.
//!
//! ## Quick Start
//!
//! ```
//! use tocmark::{decode_outline, encode_outline};
//!
//! fn main() -> tocmark::Result<()> {
//!     let text = "- Chapter 1#1\n  - Section 1.1#2\n- Chapter 2#10";
//!     let decoded = decode_outline(text)?;
//!     assert_eq!(decoded.entries.len(), 3);
//!
//!     // Round-trips back to the same text.
//!     let encoded = encode_outline(&decoded.entries, &decoded.labels)?;
//!     assert_eq!(encoded, text);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline text codec**: nested outline with page-gap and page-label
//!   directives, decoded by an explicit per-line state machine
//! - **XFDF annotation codec**: the eight markup annotation kinds, with
//!   per-kind geometry and attribute rules
//! - **Geometry resolution**: per-kind covered regions and word-to-annotation
//!   text association, with an optional OCR fallback
//! - **Facade**: whole-replacement import/export against a document engine
//!   behind trait boundaries
//!
//! Decoding is all-or-nothing: a single malformed line or unsupported
//! annotation aborts the pass and nothing is written.

pub mod engine;
pub mod error;
pub mod facade;
pub mod label;
pub mod model;
pub mod resolver;
pub mod toc;
pub mod xfdf;

// Re-export commonly used types
pub use engine::{DocumentEngine, NativeAnnotation, OcrService, PageHandle, RasterImage};
pub use error::{Error, Result};
pub use facade::{
    collect_annotations, export_annotations, export_outline, import_annotations, import_outline,
    AnnotationRecord, InterchangeOptions,
};
pub use model::{
    flip, Annotation, AnnotationKind, Border, BorderEffect, Color, LabelStyle, Line, LineEnding,
    OutlineEntry, PageLabelRule, Point, Popup, Rect, WordBox,
};
pub use toc::{decode_outline, encode_outline, DecodedOutline};
pub use xfdf::{decode_annotation, decode_annotations, encode_annotation, encode_annotations};

use std::fs;
use std::path::Path;

/// Read and decode an outline text file.
///
/// # Example
///
/// ```no_run
/// let decoded = tocmark::decode_outline_file("toc.txt").unwrap();
/// println!("{} entries", decoded.entries.len());
/// ```
pub fn decode_outline_file<P: AsRef<Path>>(path: P) -> Result<DecodedOutline> {
    let text = fs::read_to_string(path)?;
    decode_outline(&text)
}

/// Encode an outline and write it to a file, with a trailing newline.
pub fn encode_outline_to_file<P: AsRef<Path>>(
    entries: &[OutlineEntry],
    labels: &[PageLabelRule],
    path: P,
) -> Result<()> {
    let mut text = encode_outline(entries, labels)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.txt");

        let entries = vec![
            OutlineEntry::new(1, "Chapter 1", 1),
            OutlineEntry::new(2, "Section 1.1", 2),
        ];
        let labels = vec![PageLabelRule::new(0, "", LabelStyle::LowerRoman, 1)];

        encode_outline_to_file(&entries, &labels, &path).unwrap();
        let decoded = decode_outline_file(&path).unwrap();
        assert_eq!(decoded.entries, entries);
        assert_eq!(decoded.labels, labels);
    }

    #[test]
    fn test_decode_outline_file_missing() {
        let result = decode_outline_file("/nonexistent/toc.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
