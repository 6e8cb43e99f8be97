//! Document interchange facade.
//!
//! Orchestrates the codecs against a live [`DocumentEngine`] handle. Imports
//! are whole-replacement and all-or-nothing: the textual artifact is decoded
//! completely before the first write to the document, so a malformed input
//! leaves the document untouched.

use crate::engine::{DocumentEngine, NativeAnnotation, OcrService};
use crate::error::Result;
use crate::model::{flip, Annotation, AnnotationKind};
use crate::{resolver, toc, xfdf};
use serde::{Deserialize, Serialize};
use std::io;

/// Configuration for facade operations.
///
/// Explicit values passed per call; there is no ambient module-level
/// configuration.
#[derive(Debug, Clone)]
pub struct InterchangeOptions {
    /// Zoom factor for rendering annotation clips handed to OCR
    pub zoom: f32,

    /// Language hint passed to the OCR collaborator
    pub ocr_language: String,
}

impl InterchangeOptions {
    /// Create options with defaults (`zoom` 4.0, language `"eng"`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clip rendering zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the OCR language hint.
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }
}

impl Default for InterchangeOptions {
    fn default() -> Self {
        Self {
            zoom: 4.0,
            ocr_language: "eng".to_string(),
        }
    }
}

/// Encode a document's outline and page labels as outline text.
pub fn export_outline(engine: &dyn DocumentEngine) -> Result<String> {
    let entries = engine.outline();
    let labels = engine.page_labels();
    log::debug!(
        "exporting outline: {} entries, {} label rules",
        entries.len(),
        labels.len()
    );
    toc::encode_outline(&entries, &labels)
}

/// Decode outline text and replace the document's outline and page labels.
///
/// The text is decoded in full before anything is written; a decode failure
/// leaves the document unmodified.
pub fn import_outline(engine: &mut dyn DocumentEngine, text: &str) -> Result<()> {
    let decoded = toc::decode_outline(text)?;
    log::debug!(
        "importing outline: {} entries, {} label rules",
        decoded.entries.len(),
        decoded.labels.len()
    );
    engine.set_page_labels(&decoded.labels)?;
    engine.set_outline(&decoded.entries)
}

/// Export all supported annotations in the document as an XFDF document.
///
/// Pages are walked in order and annotations within a page in document
/// order; the output order is part of the contract.
pub fn export_annotations(engine: &dyn DocumentEngine) -> Result<String> {
    let mut annots = Vec::new();
    for index in 0..engine.page_count() {
        let page = engine.page(index)?;
        let height = page.height();
        for native in page.annotations() {
            if let Some(annot) = annotation_from_native(native, index, height) {
                annots.push(annot);
            }
        }
    }
    xfdf::encode_annotations(&annots)
}

/// Decode an XFDF document and replace the document's annotation set.
///
/// All-or-nothing: decoding the whole artifact precedes the single write.
pub fn import_annotations(engine: &mut dyn DocumentEngine, xml: &str) -> Result<()> {
    let heights = page_heights(engine)?;
    let annots = xfdf::decode_annotations(xml, &heights)?;
    log::debug!("importing {} annotations", annots.len());
    engine.replace_annotations(annots)
}

/// One annotation with its resolved context, ready for report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Stable identifier, `annot-{page}-{n}` with per-page numbering
    pub id: String,

    /// Page number (1-based)
    pub page: u32,

    /// Annotation kind
    pub kind: AnnotationKind,

    /// Stroke color as `#RRGGBB`
    pub color: String,

    /// Vertical position of the annotation top as a fraction of the page
    /// height, measured from the top of the page
    pub height: f32,

    /// Comment attached to the annotation
    pub comment: String,

    /// Body text under the annotation's regions (possibly via OCR)
    pub text: String,
}

/// Collect all supported annotations with their associated body text.
///
/// Words and annotations are taken per page in document order; annotation
/// numbering restarts on each page. When region association finds no text
/// and an OCR collaborator is present, the first region is rendered at
/// `options.zoom` and recognized; an OCR failure aborts the collection.
pub fn collect_annotations(
    engine: &dyn DocumentEngine,
    ocr: Option<&dyn OcrService>,
    options: &InterchangeOptions,
) -> Result<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for index in 0..engine.page_count() {
        let page = engine.page(index)?;
        let height = page.height();
        let words = page.words();
        let mut annot_num = 0u32;
        for native in page.annotations() {
            let Some(annot) = annotation_from_native(native, index, height) else {
                continue;
            };
            let regions = resolver::resolve_regions(&annot, page.width());
            let mut text = resolver::associate_text(&regions, &words);
            if text.is_empty() {
                if let (Some(ocr), Some(first)) =
                    (ocr, regions.first().filter(|r| !r.is_empty()))
                {
                    log::debug!("falling back to OCR for annotation on page {}", index + 1);
                    let image = page.render_clip(*first, options.zoom)?;
                    text = ocr.recognize(&image, &options.ocr_language)?;
                }
            }
            records.push(AnnotationRecord {
                id: format!("annot-{}-{}", index + 1, annot_num),
                page: index + 1,
                kind: annot.kind,
                color: annot.stroke_color.to_hex(),
                height: flip(annot.rect.y1, height) / height,
                comment: annot.comment.clone(),
                text,
            });
            annot_num += 1;
        }
    }
    Ok(records)
}

/// Serialize annotation records as JSON.
pub fn records_to_json(records: &[AnnotationRecord], pretty: bool) -> Result<String> {
    let result = if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    };
    result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Build an interchange annotation from a native accessor view.
///
/// Returns `None` for annotation types outside the supported set.
pub fn annotation_from_native(
    native: &dyn NativeAnnotation,
    page: u32,
    page_height: f32,
) -> Option<Annotation> {
    let kind = native.kind()?;
    let mut annot = Annotation::new(kind, page, page_height, native.rect());
    annot.stroke_color = native.stroke_color();
    annot.fill_color = native.fill_color();
    annot.comment = native.comment();
    annot.border = native.border();
    annot.icon = native.icon();
    annot.line = native.line();
    annot.ink_strokes = native.ink_strokes();
    annot.popup = native.popup();
    if kind.is_text_markup() {
        annot = annot.with_vertices(native.vertices());
    }
    Some(annot)
}

fn page_heights(engine: &dyn DocumentEngine) -> Result<Vec<f32>> {
    (0..engine.page_count())
        .map(|index| engine.page(index).map(|p| p.height()))
        .collect()
}
