//! Collaborator traits for the document engine and OCR service.
//!
//! The interchange facade never talks to a concrete PDF library; it consumes
//! these traits. An engine handle is a single-writer resource: at most one
//! outline/annotation mutation pass may be in flight per handle, and callers
//! must serialize concurrent passes themselves.

use crate::error::Result;
use crate::model::{
    Annotation, AnnotationKind, Border, Color, Line, OutlineEntry, PageLabelRule, Point, Popup,
    Rect, WordBox,
};

/// A rasterized clip of a page region, as produced by the engine.
///
/// The pixel layout is engine-defined; tocmark only carries the image
/// through to the OCR collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Raw pixel data
    pub data: Vec<u8>,
}

/// Accessor view over one native annotation object.
///
/// Implementations adapt whatever the underlying document library exposes;
/// the facade uses these accessors to build the interchange model.
pub trait NativeAnnotation {
    /// Interchange kind, or `None` for annotation types outside the
    /// supported set (those are skipped, not errors).
    fn kind(&self) -> Option<AnnotationKind>;

    /// Bounding rectangle in native space.
    fn rect(&self) -> Rect;

    /// Quad vertices for text markup kinds; empty otherwise.
    fn vertices(&self) -> Vec<Point>;

    /// Stroke color.
    fn stroke_color(&self) -> Color;

    /// Interior fill color, if set.
    fn fill_color(&self) -> Option<Color>;

    /// Free-text comment.
    fn comment(&self) -> String;

    /// Icon name, if set (`Text` kind).
    fn icon(&self) -> Option<String>;

    /// Border styling.
    fn border(&self) -> Border;

    /// Endpoint geometry (`Line` kind).
    ///
    /// Engines exposing numeric ending-style codes can map them with
    /// [`crate::model::LineEnding::from_code`].
    fn line(&self) -> Option<Line>;

    /// Stroke point sequences (`Ink` kind).
    fn ink_strokes(&self) -> Vec<Vec<Point>>;

    /// Attached pop-up window, if any.
    fn popup(&self) -> Option<Popup>;
}

/// Read access to one page of a live document.
pub trait PageHandle {
    /// Page height in points.
    fn height(&self) -> f32;

    /// Page width in points.
    fn width(&self) -> f32;

    /// Words on the page, in top-down reading order.
    ///
    /// Implementations can use [`crate::model::sort_reading_order`] to
    /// order raw extraction output.
    fn words(&self) -> Vec<WordBox>;

    /// Annotations on the page, in document order.
    fn annotations(&self) -> Vec<&dyn NativeAnnotation>;

    /// Rasterize a clip of the page at the given zoom factor.
    fn render_clip(&self, rect: Rect, zoom: f32) -> Result<RasterImage>;
}

/// Read/write access to a live document.
pub trait DocumentEngine {
    /// Current outline, in document order.
    fn outline(&self) -> Vec<OutlineEntry>;

    /// Replace the outline wholesale.
    fn set_outline(&mut self, entries: &[OutlineEntry]) -> Result<()>;

    /// Current page label rules, in order.
    fn page_labels(&self) -> Vec<PageLabelRule>;

    /// Replace the page label rules wholesale.
    fn set_page_labels(&mut self, rules: &[PageLabelRule]) -> Result<()>;

    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Access one page by 0-based index.
    fn page(&self, index: u32) -> Result<&dyn PageHandle>;

    /// Replace the document's annotation set wholesale.
    fn replace_annotations(&mut self, annots: Vec<Annotation>) -> Result<()>;
}

/// Blocking OCR collaborator.
///
/// Calls are unretried; a failure surfaces immediately as
/// [`crate::Error::Ocr`] and callers needing resilience must wrap the call.
pub trait OcrService {
    /// Recognize text in an image.
    fn recognize(&self, image: &RasterImage, language: &str) -> Result<String>;
}
