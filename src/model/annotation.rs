//! Annotation model types.
//!
//! Annotations are expressed in native page space (bottom-left origin); the
//! interchange codec applies the y-flip on the way in and out. Construction
//! never mutates shared state: every codec produces fresh values.

use super::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The closed set of annotation kinds covered by the interchange codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Text,
    Line,
    Square,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    Ink,
}

impl AnnotationKind {
    /// Lowercased element name used in the interchange schema.
    pub fn tag(&self) -> &'static str {
        match self {
            AnnotationKind::Text => "text",
            AnnotationKind::Line => "line",
            AnnotationKind::Square => "square",
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Underline => "underline",
            AnnotationKind::Squiggly => "squiggly",
            AnnotationKind::StrikeOut => "strikeout",
            AnnotationKind::Ink => "ink",
        }
    }

    /// Resolve an interchange element name back to a kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(AnnotationKind::Text),
            "line" => Some(AnnotationKind::Line),
            "square" => Some(AnnotationKind::Square),
            "highlight" => Some(AnnotationKind::Highlight),
            "underline" => Some(AnnotationKind::Underline),
            "squiggly" => Some(AnnotationKind::Squiggly),
            "strikeout" => Some(AnnotationKind::StrikeOut),
            "ink" => Some(AnnotationKind::Ink),
            _ => None,
        }
    }

    /// Whether this kind carries quad-point text markup geometry.
    pub fn is_text_markup(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Highlight
                | AnnotationKind::Underline
                | AnnotationKind::Squiggly
                | AnnotationKind::StrikeOut
        )
    }
}

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Parse a `#RRGGBB` string.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Line ending styles from the interchange ending-style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Square,
    Circle,
    Diamond,
    OpenArrow,
    ClosedArrow,
    Butt,
    ROpenArrow,
    RClosedArrow,
    Slash,
}

impl LineEnding {
    const TABLE: [LineEnding; 9] = [
        LineEnding::Square,
        LineEnding::Circle,
        LineEnding::Diamond,
        LineEnding::OpenArrow,
        LineEnding::ClosedArrow,
        LineEnding::Butt,
        LineEnding::ROpenArrow,
        LineEnding::RClosedArrow,
        LineEnding::Slash,
    ];

    /// Schema name of the ending style.
    pub fn name(&self) -> &'static str {
        match self {
            LineEnding::Square => "Square",
            LineEnding::Circle => "Circle",
            LineEnding::Diamond => "Diamond",
            LineEnding::OpenArrow => "OpenArrow",
            LineEnding::ClosedArrow => "ClosedArrow",
            LineEnding::Butt => "Butt",
            LineEnding::ROpenArrow => "ROpenArrow",
            LineEnding::RClosedArrow => "RClosedArrow",
            LineEnding::Slash => "Slash",
        }
    }

    /// Resolve a schema name back to an ending style.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::TABLE.iter().copied().find(|e| e.name() == name)
    }

    /// Resolve a native 1-based style code; 0 means "no ending".
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => None,
            n => Self::TABLE.get(n as usize - 1).copied(),
        }
    }
}

/// Border styling of an annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Border {
    /// Stroke width in points; `None` when the document leaves it unset
    pub width: Option<f32>,

    /// Dash or cloud effect; mutually exclusive by construction
    pub effect: BorderEffect,
}

/// Border effect variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderEffect {
    /// Plain solid border
    #[default]
    Solid,
    /// Dashed border with the given dash lengths
    Dash(Vec<f32>),
    /// Cloudy border with the given intensity
    Cloudy(f32),
}

/// Endpoint geometry of a `Line` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub head: Option<LineEnding>,
    pub tail: Option<LineEnding>,
}

/// Pop-up window state attached to an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    /// Whether the pop-up is initially open
    pub open: bool,

    /// Pop-up window rectangle in native space
    pub rect: Rect,
}

/// A single markup annotation in native page space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation kind
    pub kind: AnnotationKind,

    /// Page index the annotation sits on (0-based)
    pub page: u32,

    /// Height of that page, fixed at construction so the y-flip is stable
    pub page_height: f32,

    /// Bounding rectangle of the annotation
    pub rect: Rect,

    /// Rectangles the annotation covers; one per quad for text markup,
    /// the bounding rect itself otherwise
    pub rect_list: Vec<Rect>,

    /// Stroke color
    pub stroke_color: Color,

    /// Interior fill color, if any
    pub fill_color: Option<Color>,

    /// Free-text comment attached to the annotation
    pub comment: String,

    /// Border styling
    pub border: Border,

    /// Icon name (`Text` kind only)
    pub icon: Option<String>,

    /// Endpoint geometry (`Line` kind only)
    pub line: Option<Line>,

    /// Stroke point sequences (`Ink` kind only)
    pub ink_strokes: Vec<Vec<Point>>,

    /// Quad vertices in document order (text markup kinds only)
    pub vertices: Vec<Point>,

    /// Attached pop-up window, if any
    pub popup: Option<Popup>,
}

impl Annotation {
    /// Create a new annotation with defaults for all optional fields.
    pub fn new(kind: AnnotationKind, page: u32, page_height: f32, rect: Rect) -> Self {
        Self {
            kind,
            page,
            page_height,
            rect,
            rect_list: vec![rect],
            stroke_color: Color::BLACK,
            fill_color: None,
            comment: String::new(),
            border: Border::default(),
            icon: None,
            line: None,
            ink_strokes: Vec::new(),
            vertices: Vec::new(),
            popup: None,
        }
    }

    /// Set the stroke color.
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }

    /// Set the interior fill color.
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Set the comment text.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the border styling.
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Set the icon name (`Text` kind).
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the endpoint geometry (`Line` kind).
    pub fn with_line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the ink strokes (`Ink` kind).
    pub fn with_ink_strokes(mut self, strokes: Vec<Vec<Point>>) -> Self {
        self.ink_strokes = strokes;
        self
    }

    /// Set the quad vertices (text markup kinds) and re-derive `rect_list`
    /// from them, one rectangle per 4-point group.
    pub fn with_vertices(mut self, vertices: Vec<Point>) -> Self {
        self.rect_list = vertices.chunks_exact(4).map(Rect::bounding).collect();
        self.vertices = vertices;
        self
    }

    /// Attach a pop-up window.
    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }
}
