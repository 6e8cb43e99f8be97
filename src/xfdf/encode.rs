//! XFDF encoding.

use super::{
    fmt_num, fmt_point, fmt_rect, to_schema_name, CLOUD_FRINGE, DEFAULT_ICON, FLAGS_PRINT,
    XFDF_NAMESPACE,
};
use crate::error::{Error, Result};
use crate::model::{Annotation, AnnotationKind, BorderEffect};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Encode a set of annotations as a complete XFDF document.
///
/// Annotations are emitted in input order under `<xfdf><annots>`. The input
/// is not modified.
pub fn encode_annotations(annots: &[Annotation]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("xfdf");
    root.push_attribute(("xmlns", XFDF_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("annots")))?;
    for annot in annots {
        write_annotation(&mut writer, annot)?;
    }
    writer.write_event(Event::End(BytesEnd::new("annots")))?;
    writer.write_event(Event::End(BytesEnd::new("xfdf")))?;

    into_string(writer)
}

/// Encode a single annotation as a standalone element fragment.
pub fn encode_annotation(annot: &Annotation) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_annotation(&mut writer, annot)?;
    into_string(writer)
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| Error::MalformedInterchange(e.to_string()))
}

fn write_annotation<W: Write>(writer: &mut Writer<W>, annot: &Annotation) -> Result<()> {
    let height = annot.page_height;
    let tag = annot.kind.tag();
    let mut el = BytesStart::new(tag);

    el.push_attribute(("page", annot.page.to_string().as_str()));
    el.push_attribute(("rect", fmt_rect(&annot.rect, height).as_str()));
    el.push_attribute((to_schema_name("stroke_color"), annot.stroke_color.to_hex().as_str()));
    if let Some(fill) = annot.fill_color {
        el.push_attribute((to_schema_name("fill_color"), fill.to_hex().as_str()));
    }
    el.push_attribute(("flags", FLAGS_PRINT));

    if let Some(width) = annot.border.width {
        el.push_attribute((to_schema_name("border_width"), fmt_num(width).as_str()));
    }
    match &annot.border.effect {
        BorderEffect::Solid => {}
        BorderEffect::Dash(dashes) => {
            let joined = dashes.iter().map(|d| fmt_num(*d)).collect::<Vec<_>>().join(",");
            el.push_attribute((to_schema_name("border_style"), "dash"));
            el.push_attribute((to_schema_name("border_dashes"), joined.as_str()));
        }
        BorderEffect::Cloudy(intensity) => {
            el.push_attribute((to_schema_name("border_style"), "cloudy"));
            el.push_attribute((to_schema_name("border_intensity"), fmt_num(*intensity).as_str()));
            el.push_attribute(("fringe", CLOUD_FRINGE));
        }
    }

    match annot.kind {
        AnnotationKind::Text => {
            el.push_attribute(("icon", annot.icon.as_deref().unwrap_or(DEFAULT_ICON)));
        }
        AnnotationKind::Line => {
            let line = annot.line.ok_or_else(|| {
                Error::MalformedInterchange("line annotation missing endpoints".to_string())
            })?;
            el.push_attribute(("start", fmt_point(line.start, height).as_str()));
            el.push_attribute(("end", fmt_point(line.end, height).as_str()));
            if let Some(head) = line.head {
                el.push_attribute(("head", head.name()));
            }
            if let Some(tail) = line.tail {
                el.push_attribute(("tail", tail.name()));
            }
        }
        AnnotationKind::Highlight
        | AnnotationKind::Underline
        | AnnotationKind::Squiggly
        | AnnotationKind::StrikeOut => {
            if annot.vertices.is_empty() {
                return Err(Error::MalformedInterchange(format!(
                    "{} annotation missing quad points",
                    tag
                )));
            }
            let coords = annot
                .vertices
                .iter()
                .map(|p| fmt_point(*p, height))
                .collect::<Vec<_>>()
                .join(",");
            el.push_attribute(("coords", coords.as_str()));
        }
        AnnotationKind::Square | AnnotationKind::Ink => {}
    }

    let needs_children = !annot.comment.is_empty()
        || annot.popup.is_some()
        || annot.kind == AnnotationKind::Ink;
    if !needs_children {
        writer.write_event(Event::Empty(el))?;
        return Ok(());
    }

    writer.write_event(Event::Start(el))?;
    if !annot.comment.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("contents")))?;
        writer.write_event(Event::Text(BytesText::new(&annot.comment)))?;
        writer.write_event(Event::End(BytesEnd::new("contents")))?;
    }
    if annot.kind == AnnotationKind::Ink {
        if annot.ink_strokes.is_empty() {
            return Err(Error::MalformedInterchange(
                "ink annotation missing strokes".to_string(),
            ));
        }
        writer.write_event(Event::Start(BytesStart::new("inklist")))?;
        for stroke in &annot.ink_strokes {
            let points = stroke
                .iter()
                .map(|p| fmt_point(*p, height))
                .collect::<Vec<_>>()
                .join(";");
            writer.write_event(Event::Start(BytesStart::new("gesture")))?;
            writer.write_event(Event::Text(BytesText::new(&points)))?;
            writer.write_event(Event::End(BytesEnd::new("gesture")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("inklist")))?;
    }
    if let Some(popup) = annot.popup {
        let mut el = BytesStart::new("popup");
        el.push_attribute(("open", if popup.open { "yes" } else { "no" }));
        el.push_attribute(("page", annot.page.to_string().as_str()));
        el.push_attribute(("rect", fmt_rect(&popup.rect, height).as_str()));
        writer.write_event(Event::Empty(el))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
