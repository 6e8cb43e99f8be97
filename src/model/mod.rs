//! Model types for outline and annotation interchange.
//!
//! This module defines the in-memory representation that bridges the native
//! document engine and the textual interchange formats. All geometry is in
//! native page space (bottom-left origin, y up); the codecs apply the y-flip
//! when crossing into the top-left-origin interchange space.

mod annotation;
mod geometry;
mod outline;
mod word;

pub use annotation::{
    Annotation, AnnotationKind, Border, BorderEffect, Color, Line, LineEnding, Popup,
};
pub use geometry::{flip, Point, Rect};
pub use outline::{LabelStyle, OutlineEntry, PageLabelRule};
pub use word::{sort_reading_order, WordBox};
