//! XFDF decoding.
//!
//! Streams over the XML events, dispatching on the element name through the
//! closed [`AnnotationKind`] enum. Decoding fails fast: the first unknown
//! annotation element or missing required attribute aborts the whole decode
//! and nothing is returned. Non-annotation subtrees outside `<annots>`
//! (form fields, file references) are skipped.

use super::{model_attrs, parse_floats, parse_point, parse_rect};
use crate::error::{Error, Result};
use crate::model::{flip, Annotation, AnnotationKind, Border, BorderEffect, Color, Line, LineEnding, Point, Popup};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Which element's text content is currently being captured.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TextTarget {
    None,
    Contents,
    Gesture,
}

/// Decode a complete XFDF document (or a bare annotation fragment) into
/// annotations, in document order.
///
/// `page_heights` maps 0-based page indices to page heights; every y
/// coordinate is un-flipped against the height of the page its annotation
/// references.
pub fn decode_annotations(xml: &str, page_heights: &[f32]) -> Result<Vec<Annotation>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut in_annots = false;
    let mut skip_depth = 0usize;
    let mut current: Option<Annotation> = None;
    let mut target = TextTarget::None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match handle_open(&name, &e, in_annots, &mut current, page_heights)? {
                        Open::Annots => in_annots = true,
                        Open::Annotation(annot) => current = Some(annot),
                        Open::Target(t) => target = t,
                        Open::Skip => skip_depth = 1,
                        Open::Nothing => {}
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if skip_depth == 0 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match handle_open(&name, &e, in_annots, &mut current, page_heights)? {
                        Open::Annotation(annot) => out.push(finalize(annot)?),
                        Open::Annots | Open::Target(_) | Open::Skip | Open::Nothing => {}
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if skip_depth > 0 {
                    buf.clear();
                    continue;
                }
                let text = e
                    .unescape()
                    .map_err(|e| Error::MalformedInterchange(e.to_string()))?
                    .to_string();
                if let Some(annot) = current.as_mut() {
                    match target {
                        TextTarget::Contents => annot.comment = text,
                        TextTarget::Gesture => {
                            let stroke = parse_gesture(&text, annot.page_height)?;
                            annot.ink_strokes.push(stroke);
                        }
                        TextTarget::None => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "annots" => in_annots = false,
                        "contents" | "gesture" => target = TextTarget::None,
                        "xfdf" | "inklist" => {}
                        _ => {
                            if let Some(annot) = current.take() {
                                out.push(finalize(annot)?);
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::MalformedInterchange(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Decode a single annotation element fragment.
pub fn decode_annotation(xml: &str, page_heights: &[f32]) -> Result<Annotation> {
    let mut annots = decode_annotations(xml, page_heights)?;
    if annots.is_empty() {
        return Err(Error::MalformedInterchange(
            "no annotation element found".to_string(),
        ));
    }
    Ok(annots.swap_remove(0))
}

/// Outcome of an opening (or empty) element.
enum Open {
    Annots,
    Annotation(Annotation),
    Target(TextTarget),
    Skip,
    Nothing,
}

fn handle_open(
    name: &str,
    e: &BytesStart<'_>,
    in_annots: bool,
    current: &mut Option<Annotation>,
    page_heights: &[f32],
) -> Result<Open> {
    match name {
        "xfdf" => Ok(Open::Nothing),
        "annots" => Ok(Open::Annots),
        "contents" if current.is_some() => Ok(Open::Target(TextTarget::Contents)),
        "gesture" if current.is_some() => Ok(Open::Target(TextTarget::Gesture)),
        "inklist" if current.is_some() => Ok(Open::Nothing),
        "popup" => {
            if let Some(annot) = current.as_mut() {
                annot.popup = Some(parse_popup(e, annot.page_height)?);
                Ok(Open::Nothing)
            } else {
                Err(Error::MalformedInterchange(
                    "<popup> outside an annotation element".to_string(),
                ))
            }
        }
        _ => {
            if current.is_some() {
                // Unknown child of an open annotation (appearance streams,
                // rich text): skip the subtree.
                log::debug!("skipping unknown annotation child <{}>", name);
                Ok(Open::Skip)
            } else if AnnotationKind::from_tag(name).is_some() {
                Ok(Open::Annotation(parse_annotation(name, e, page_heights)?))
            } else if in_annots {
                Err(Error::UnsupportedAnnotation(name.to_string()))
            } else {
                // Sibling of <annots> such as <fields> or <f>: not ours.
                log::debug!("skipping non-annotation subtree <{}>", name);
                Ok(Open::Skip)
            }
        }
    }
}

/// Validate kind-specific geometry once all children have been seen.
fn finalize(annot: Annotation) -> Result<Annotation> {
    if annot.kind == AnnotationKind::Ink && annot.ink_strokes.is_empty() {
        return Err(Error::MalformedInterchange(
            "ink annotation missing strokes".to_string(),
        ));
    }
    Ok(annot)
}

fn attr_map(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::MalformedInterchange(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::MalformedInterchange(e.to_string()))?
            .to_string();
        map.insert(key, value);
    }
    Ok(map)
}

fn required<'a>(attrs: &'a HashMap<String, String>, key: &str, tag: &str) -> Result<&'a str> {
    attrs.get(key).map(String::as_str).ok_or_else(|| {
        Error::MalformedInterchange(format!("<{}> missing required {:?} attribute", tag, key))
    })
}

fn parse_annotation(tag: &str, e: &BytesStart<'_>, page_heights: &[f32]) -> Result<Annotation> {
    let kind = AnnotationKind::from_tag(tag)
        .ok_or_else(|| Error::UnsupportedAnnotation(tag.to_string()))?;
    let attrs = model_attrs(&attr_map(e)?);

    let page: u32 = required(&attrs, "page", tag)?
        .parse()
        .map_err(|_| Error::MalformedInterchange(format!("<{}> has invalid page index", tag)))?;
    let height = *page_heights
        .get(page as usize)
        .ok_or(Error::PageOutOfRange(page, page_heights.len() as u32))?;
    let rect = parse_rect(required(&attrs, "rect", tag)?, height)?;

    let mut annot = Annotation::new(kind, page, height, rect);

    if let Some(hex) = attrs.get("stroke_color") {
        annot.stroke_color = Color::from_hex(hex)
            .ok_or_else(|| Error::MalformedInterchange(format!("invalid color {:?}", hex)))?;
    }
    if let Some(hex) = attrs.get("fill_color") {
        annot.fill_color = Some(
            Color::from_hex(hex)
                .ok_or_else(|| Error::MalformedInterchange(format!("invalid color {:?}", hex)))?,
        );
    }
    annot.border = parse_border(&attrs)?;

    match kind {
        AnnotationKind::Text => {
            annot.icon = attrs.get("icon").cloned();
        }
        AnnotationKind::Line => {
            let start = parse_point(required(&attrs, "start", tag)?, height)?;
            let end = parse_point(required(&attrs, "end", tag)?, height)?;
            annot.line = Some(Line {
                start,
                end,
                head: parse_ending(&attrs, "head")?,
                tail: parse_ending(&attrs, "tail")?,
            });
        }
        AnnotationKind::Highlight
        | AnnotationKind::Underline
        | AnnotationKind::Squiggly
        | AnnotationKind::StrikeOut => {
            let coords = parse_floats(required(&attrs, "coords", tag)?)?;
            if coords.len() % 2 != 0 {
                return Err(Error::MalformedInterchange(format!(
                    "<{}> coords has an odd number of values",
                    tag
                )));
            }
            let vertices: Vec<Point> = coords
                .chunks_exact(2)
                .map(|pair| Point::new(pair[0], flip(pair[1], height)))
                .collect();
            annot = annot.with_vertices(vertices);
        }
        AnnotationKind::Square | AnnotationKind::Ink => {}
    }
    Ok(annot)
}

fn parse_border(attrs: &HashMap<String, String>) -> Result<Border> {
    let width = match attrs.get("border_width") {
        Some(raw) => Some(raw.parse::<f32>().map_err(|_| {
            Error::MalformedInterchange(format!("invalid border width {:?}", raw))
        })?),
        None => None,
    };
    let effect = match attrs.get("border_style").map(String::as_str) {
        None => BorderEffect::Solid,
        Some("dash") => {
            let dashes = parse_floats(required(attrs, "border_dashes", "border")?)?;
            BorderEffect::Dash(dashes)
        }
        Some("cloudy") => {
            let raw = required(attrs, "border_intensity", "border")?;
            let intensity = raw.parse::<f32>().map_err(|_| {
                Error::MalformedInterchange(format!("invalid cloud intensity {:?}", raw))
            })?;
            BorderEffect::Cloudy(intensity)
        }
        Some(other) => {
            return Err(Error::MalformedInterchange(format!(
                "unknown border style {:?}",
                other
            )))
        }
    };
    Ok(Border { width, effect })
}

fn parse_ending(attrs: &HashMap<String, String>, key: &str) -> Result<Option<LineEnding>> {
    match attrs.get(key) {
        None => Ok(None),
        Some(name) => LineEnding::from_name(name).map(Some).ok_or_else(|| {
            Error::MalformedInterchange(format!("unknown line ending {:?}", name))
        }),
    }
}

fn parse_popup(e: &BytesStart<'_>, page_height: f32) -> Result<Popup> {
    let attrs = attr_map(e)?;
    let open = matches!(attrs.get("open").map(String::as_str), Some("yes"));
    let rect = parse_rect(required(&attrs, "rect", "popup")?, page_height)?;
    Ok(Popup { open, rect })
}

/// Parse a `;`-joined gesture point list back into native space.
fn parse_gesture(text: &str, page_height: f32) -> Result<Vec<Point>> {
    text.split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_point(part, page_height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    const HEIGHTS: &[f32] = &[800.0];

    #[test]
    fn test_decode_highlight_unflips_to_native_rect() {
        let xml = r##"<highlight page="0" rect="10,0,110,20" color="#ffff00" flags="print"
            coords="10,0,110,0,10,20,110,20"/>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        assert_eq!(annot.kind, AnnotationKind::Highlight);
        let expected = Rect::new(10.0, 780.0, 110.0, 800.0);
        assert!((annot.rect.x0 - expected.x0).abs() < 1e-3);
        assert!((annot.rect.y0 - expected.y0).abs() < 1e-3);
        assert!((annot.rect.y1 - expected.y1).abs() < 1e-3);
        assert_eq!(annot.rect_list.len(), 1);
        assert!((annot.rect_list[0].y0 - 780.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_highlight_without_coords_fails() {
        let xml = r##"<highlight page="0" rect="10,0,110,20" color="#ffff00"/>"##;
        assert!(matches!(
            decode_annotation(xml, HEIGHTS),
            Err(Error::MalformedInterchange(_))
        ));
    }

    #[test]
    fn test_decode_unknown_tag_inside_annots() {
        let xml = r#"<xfdf xmlns="http://ns.adobe.com/xfdf/"><annots>
            <stamp page="0" rect="0,0,1,1"/>
        </annots></xfdf>"#;
        assert!(matches!(
            decode_annotations(xml, HEIGHTS),
            Err(Error::UnsupportedAnnotation(_))
        ));
    }

    #[test]
    fn test_decode_skips_non_annots_siblings() {
        let xml = r##"<xfdf xmlns="http://ns.adobe.com/xfdf/">
            <f href="source.pdf"/>
            <fields><field name="x"><value>1</value></field></fields>
            <annots>
                <square page="0" rect="10,700,60,760" color="#ff0000"/>
            </annots>
        </xfdf>"##;
        let annots = decode_annotations(xml, HEIGHTS).unwrap();
        assert_eq!(annots.len(), 1);
        assert_eq!(annots[0].kind, AnnotationKind::Square);
    }

    #[test]
    fn test_decode_page_out_of_range() {
        let xml = r##"<square page="3" rect="0,0,1,1" color="#ff0000"/>"##;
        assert!(matches!(
            decode_annotation(xml, HEIGHTS),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_decode_ink_gestures() {
        let xml = r##"<ink page="0" rect="0,700,100,790" color="#0000ff">
            <inklist><gesture>10,790;20,780;30,790</gesture><gesture>40,700;50,710</gesture></inklist>
        </ink>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        assert_eq!(annot.ink_strokes.len(), 2);
        // 790 in interchange space is 10 in native space on an 800pt page.
        assert!((annot.ink_strokes[0][0].y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_ink_without_strokes_fails() {
        let xml = r##"<ink page="0" rect="0,0,10,10" color="#0000ff"><inklist></inklist></ink>"##;
        assert!(matches!(
            decode_annotation(xml, HEIGHTS),
            Err(Error::MalformedInterchange(_))
        ));
    }

    #[test]
    fn test_decode_line_endpoints_and_endings() {
        let xml = r##"<line page="0" rect="0,100,200,120" color="#00ff00"
            start="10,110" end="190,110" head="OpenArrow" tail="Butt"/>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        let line = annot.line.unwrap();
        assert!((line.start.y - 690.0).abs() < 1e-3);
        assert_eq!(line.head, Some(LineEnding::OpenArrow));
        assert_eq!(line.tail, Some(LineEnding::Butt));
    }

    #[test]
    fn test_decode_contents_and_popup() {
        let xml = r##"<text page="0" rect="10,10,30,30" color="#ff0000" icon="Comment">
            <contents>needs review</contents>
            <popup open="yes" page="0" rect="40,10,200,100"/>
        </text>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        assert_eq!(annot.comment, "needs review");
        assert_eq!(annot.icon.as_deref(), Some("Comment"));
        let popup = annot.popup.unwrap();
        assert!(popup.open);
        assert!((popup.rect.y1 - 790.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_border_styles() {
        let xml = r##"<square page="0" rect="0,0,10,10" color="#ff0000" width="2"
            style="dash" dashes="3,2"/>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        assert_eq!(annot.border.width, Some(2.0));
        assert_eq!(annot.border.effect, BorderEffect::Dash(vec![3.0, 2.0]));

        let xml = r##"<square page="0" rect="0,0,10,10" color="#ff0000"
            style="cloudy" intensity="1.5" fringe="9,9,9,9"/>"##;
        let annot = decode_annotation(xml, HEIGHTS).unwrap();
        assert_eq!(annot.border.effect, BorderEffect::Cloudy(1.5));
    }

    #[test]
    fn test_decode_malformed_xml() {
        // Mismatched end tag surfaces as a malformed-interchange error.
        let xml = "<xfdf><annots></xfdf>";
        assert!(matches!(
            decode_annotations(xml, HEIGHTS),
            Err(Error::MalformedInterchange(_))
        ));
    }
}
