//! Annotation geometry resolution and text association.
//!
//! Resolves the rectangular regions an annotation covers and pulls in the
//! body text under those regions. Line and ink marks widen to the full page
//! width so a margin stroke still captures the sentence it sits next to.

use crate::model::{Annotation, AnnotationKind, Point, Rect, WordBox};

/// Compute the regions an annotation covers, in document order.
///
/// - `Square`: the annotation's own rectangle.
/// - `Line`/`Ink`: one full-page-width band over the vertical extent.
/// - Text markup kinds: one rectangle per 4-point quad group, preserving
///   quad order (multi-line selections stay in reading order).
/// - `Text`: a single empty rectangle; no text association happens.
pub fn resolve_regions(annot: &Annotation, page_width: f32) -> Vec<Rect> {
    match annot.kind {
        AnnotationKind::Square => vec![annot.rect],
        AnnotationKind::Line | AnnotationKind::Ink => {
            vec![Rect::new(0.0, annot.rect.y0, page_width, annot.rect.y1)]
        }
        AnnotationKind::Highlight
        | AnnotationKind::Underline
        | AnnotationKind::Squiggly
        | AnnotationKind::StrikeOut => quad_rects(&annot.vertices),
        AnnotationKind::Text => vec![Rect::default()],
    }
}

/// Group a vertex list into 4-point quads and return one bounding rectangle
/// per quad, in order. A trailing partial group is ignored.
pub fn quad_rects(vertices: &[Point]) -> Vec<Rect> {
    vertices.chunks_exact(4).map(Rect::bounding).collect()
}

/// Select the words intersecting each region and join them into a sentence.
///
/// `words` must already be in reading order (the engine contract); selection
/// preserves that order. Per-region sentences are joined with single spaces
/// and the result is trimmed.
pub fn associate_text(regions: &[Rect], words: &[WordBox]) -> String {
    let sentences: Vec<String> = regions
        .iter()
        .map(|rect| {
            words
                .iter()
                .filter(|w| w.rect.intersects(rect))
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    sentences.join(" ").trim().to_string()
}
