//! Word boxes produced by the document engine.

use super::geometry::{flip, Rect};
use serde::{Deserialize, Serialize};

/// A word with its bounding box, as extracted from a page.
///
/// Word boxes are produced by the document engine and consumed read-only by
/// the text association logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    /// Bounding box in native space
    pub rect: Rect,

    /// Word text
    pub text: String,
}

impl WordBox {
    /// Create a new word box.
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }
}

/// Sort words into top-down reading order: ascending by the top edge in
/// interchange space, then by the left edge.
pub fn sort_reading_order(words: &mut [WordBox], page_height: f32) {
    words.sort_by(|a, b| {
        let a_key = (flip(a.rect.y1, page_height), a.rect.x0);
        let b_key = (flip(b.rect.y1, page_height), b.rect.x0);
        a_key
            .partial_cmp(&b_key)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
