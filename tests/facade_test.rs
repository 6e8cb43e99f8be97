//! Integration tests for the interchange facade, driven by mock
//! implementations of the engine and OCR collaborator traits.

use tocmark::engine::{DocumentEngine, NativeAnnotation, OcrService, PageHandle, RasterImage};
use tocmark::error::{Error, Result};
use tocmark::facade::{
    collect_annotations, export_annotations, export_outline, import_annotations, import_outline,
    records_to_json, InterchangeOptions,
};
use tocmark::model::{
    Annotation, AnnotationKind, Border, Color, Line, OutlineEntry, PageLabelRule, Point, Popup,
    Rect, WordBox,
};

#[derive(Default)]
struct MockAnnot {
    kind: Option<AnnotationKind>,
    rect: Rect,
    vertices: Vec<Point>,
    stroke: Color,
    comment: String,
}

impl NativeAnnotation for MockAnnot {
    fn kind(&self) -> Option<AnnotationKind> {
        self.kind
    }
    fn rect(&self) -> Rect {
        self.rect
    }
    fn vertices(&self) -> Vec<Point> {
        self.vertices.clone()
    }
    fn stroke_color(&self) -> Color {
        self.stroke
    }
    fn fill_color(&self) -> Option<Color> {
        None
    }
    fn comment(&self) -> String {
        self.comment.clone()
    }
    fn icon(&self) -> Option<String> {
        None
    }
    fn border(&self) -> Border {
        Border::default()
    }
    fn line(&self) -> Option<Line> {
        None
    }
    fn ink_strokes(&self) -> Vec<Vec<Point>> {
        Vec::new()
    }
    fn popup(&self) -> Option<Popup> {
        None
    }
}

struct MockPage {
    height: f32,
    width: f32,
    words: Vec<WordBox>,
    annots: Vec<MockAnnot>,
}

impl MockPage {
    fn new(height: f32, width: f32) -> Self {
        Self {
            height,
            width,
            words: Vec::new(),
            annots: Vec::new(),
        }
    }
}

impl PageHandle for MockPage {
    fn height(&self) -> f32 {
        self.height
    }
    fn width(&self) -> f32 {
        self.width
    }
    fn words(&self) -> Vec<WordBox> {
        self.words.clone()
    }
    fn annotations(&self) -> Vec<&dyn NativeAnnotation> {
        self.annots
            .iter()
            .map(|a| a as &dyn NativeAnnotation)
            .collect()
    }
    fn render_clip(&self, _rect: Rect, _zoom: f32) -> Result<RasterImage> {
        Ok(RasterImage {
            width: 8,
            height: 8,
            data: vec![0; 64],
        })
    }
}

#[derive(Default)]
struct MockEngine {
    outline: Vec<OutlineEntry>,
    labels: Vec<PageLabelRule>,
    pages: Vec<MockPage>,
    annotations: Vec<Annotation>,
    writes: u32,
}

impl DocumentEngine for MockEngine {
    fn outline(&self) -> Vec<OutlineEntry> {
        self.outline.clone()
    }
    fn set_outline(&mut self, entries: &[OutlineEntry]) -> Result<()> {
        self.outline = entries.to_vec();
        self.writes += 1;
        Ok(())
    }
    fn page_labels(&self) -> Vec<PageLabelRule> {
        self.labels.clone()
    }
    fn set_page_labels(&mut self, rules: &[PageLabelRule]) -> Result<()> {
        self.labels = rules.to_vec();
        self.writes += 1;
        Ok(())
    }
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }
    fn page(&self, index: u32) -> Result<&dyn PageHandle> {
        self.pages
            .get(index as usize)
            .map(|p| p as &dyn PageHandle)
            .ok_or(Error::PageOutOfRange(index, self.pages.len() as u32))
    }
    fn replace_annotations(&mut self, annots: Vec<Annotation>) -> Result<()> {
        self.annotations = annots;
        self.writes += 1;
        Ok(())
    }
}

struct MockOcr {
    text: &'static str,
}

impl OcrService for MockOcr {
    fn recognize(&self, _image: &RasterImage, _language: &str) -> Result<String> {
        Ok(self.text.to_string())
    }
}

struct FailingOcr;

impl OcrService for FailingOcr {
    fn recognize(&self, _image: &RasterImage, _language: &str) -> Result<String> {
        Err(Error::Ocr("backend unavailable".to_string()))
    }
}

fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    vec![
        Point::new(x0, y1),
        Point::new(x1, y1),
        Point::new(x0, y0),
        Point::new(x1, y0),
    ]
}

fn engine_with_highlight_and_square() -> MockEngine {
    let mut page = MockPage::new(800.0, 612.0);
    page.words = vec![
        WordBox::new(Rect::new(10.0, 780.0, 40.0, 792.0), "the"),
        WordBox::new(Rect::new(45.0, 780.0, 75.0, 792.0), "cat"),
        WordBox::new(Rect::new(10.0, 766.0, 40.0, 778.0), "sat"),
        WordBox::new(Rect::new(45.0, 766.0, 85.0, 778.0), "down"),
    ];
    let mut vertices = quad(10.0, 780.0, 120.0, 792.0);
    vertices.extend(quad(10.0, 766.0, 120.0, 778.0));
    page.annots = vec![
        MockAnnot {
            kind: Some(AnnotationKind::Highlight),
            rect: Rect::new(10.0, 766.0, 120.0, 792.0),
            vertices,
            stroke: Color::new(1.0, 1.0, 0.0),
            comment: "important".to_string(),
        },
        // Unsupported native kind: skipped without consuming a number.
        MockAnnot {
            kind: None,
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            ..Default::default()
        },
        // A figure box over a region with no body text.
        MockAnnot {
            kind: Some(AnnotationKind::Square),
            rect: Rect::new(200.0, 100.0, 400.0, 300.0),
            stroke: Color::new(0.0, 0.0, 1.0),
            ..Default::default()
        },
    ];
    MockEngine {
        pages: vec![page],
        ..Default::default()
    }
}

#[test]
fn test_outline_export_import_round_trip() {
    let mut engine = MockEngine {
        outline: vec![
            OutlineEntry::new(1, "Chapter 1", 1),
            OutlineEntry::new(2, "Section 1.1", 2),
        ],
        labels: vec![PageLabelRule::new(0, "", tocmark::LabelStyle::LowerRoman, 1)],
        ..Default::default()
    };
    let text = export_outline(&engine).unwrap();

    let mut target = MockEngine::default();
    import_outline(&mut target, &text).unwrap();
    assert_eq!(target.outline, engine.outline);
    assert_eq!(target.labels, engine.labels);

    // Re-import into the source is a no-op change.
    import_outline(&mut engine, &text).unwrap();
    assert_eq!(engine.outline.len(), 2);
}

#[test]
fn test_import_outline_is_atomic() {
    let mut engine = MockEngine {
        outline: vec![OutlineEntry::new(1, "Original", 1)],
        ..Default::default()
    };
    let err = import_outline(&mut engine, "- ok#1\ngarbage line").unwrap_err();
    assert!(matches!(err, Error::Format(_)));
    // Nothing was written; the original outline survives.
    assert_eq!(engine.writes, 0);
    assert_eq!(engine.outline[0].title, "Original");
}

#[test]
fn test_collect_annotations_associates_text() {
    let engine = engine_with_highlight_and_square();
    let records = collect_annotations(&engine, None, &InterchangeOptions::new()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "annot-1-0");
    assert_eq!(records[0].page, 1);
    assert_eq!(records[0].kind, AnnotationKind::Highlight);
    assert_eq!(records[0].color, "#ffff00");
    assert_eq!(records[0].comment, "important");
    assert_eq!(records[0].text, "the cat sat down");
    // 792 native top on an 800pt page sits 1% down from the page top.
    assert!((records[0].height - 0.01).abs() < 1e-4);

    // The skipped native annotation did not consume a number.
    assert_eq!(records[1].id, "annot-1-1");
    assert_eq!(records[1].kind, AnnotationKind::Square);
    assert_eq!(records[1].text, "");
}

#[test]
fn test_collect_annotations_ocr_fallback() {
    let engine = engine_with_highlight_and_square();
    let ocr = MockOcr { text: "Figure 3" };
    let records =
        collect_annotations(&engine, Some(&ocr), &InterchangeOptions::new().with_zoom(2.0))
            .unwrap();
    // The highlight found body text, so only the square fell back to OCR.
    assert_eq!(records[0].text, "the cat sat down");
    assert_eq!(records[1].text, "Figure 3");
}

#[test]
fn test_collect_annotations_ocr_failure_propagates() {
    let engine = engine_with_highlight_and_square();
    let err = collect_annotations(&engine, Some(&FailingOcr), &InterchangeOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Ocr(_)));
}

#[test]
fn test_annotation_export_import_round_trip() {
    let engine = engine_with_highlight_and_square();
    let xml = export_annotations(&engine).unwrap();
    assert!(xml.contains("<highlight "));
    assert!(xml.contains("<square "));

    let mut target = MockEngine {
        pages: vec![MockPage::new(800.0, 612.0)],
        ..Default::default()
    };
    import_annotations(&mut target, &xml).unwrap();
    assert_eq!(target.annotations.len(), 2);
    assert_eq!(target.annotations[0].kind, AnnotationKind::Highlight);
    assert_eq!(target.annotations[0].rect_list.len(), 2);
    assert_eq!(target.annotations[1].kind, AnnotationKind::Square);
}

#[test]
fn test_import_annotations_is_atomic() {
    let mut engine = MockEngine {
        pages: vec![MockPage::new(800.0, 612.0)],
        ..Default::default()
    };
    let xml = r##"<xfdf xmlns="http://ns.adobe.com/xfdf/"><annots>
        <square page="0" rect="10,700,60,760" color="#ff0000"/>
        <stamp page="0" rect="0,0,1,1"/>
    </annots></xfdf>"##;
    let err = import_annotations(&mut engine, xml).unwrap_err();
    assert!(matches!(err, Error::UnsupportedAnnotation(_)));
    assert_eq!(engine.writes, 0);
    assert!(engine.annotations.is_empty());
}

#[test]
fn test_records_serialize_to_json() {
    let engine = engine_with_highlight_and_square();
    let records = collect_annotations(&engine, None, &InterchangeOptions::new()).unwrap();
    let json = records_to_json(&records, true).unwrap();
    assert!(json.contains("\"annot-1-0\""));
    assert!(json.contains("\"highlight\""));
}
