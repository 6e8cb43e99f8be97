//! XFDF annotation codec.
//!
//! Encodes annotations to an XFDF-like XML schema and decodes them back.
//! The schema lives in top-left-origin interchange space; every y coordinate
//! is flipped against the owning page's height on the way through, and the
//! flip is its own inverse, so geometry round-trips within floating point
//! tolerance.

mod decode;
mod encode;

pub use decode::{decode_annotation, decode_annotations};
pub use encode::{encode_annotation, encode_annotations};

use crate::error::{Error, Result};
use crate::model::{flip, Point, Rect};
use std::collections::HashMap;

/// XML namespace of the interchange root element.
pub const XFDF_NAMESPACE: &str = "http://ns.adobe.com/xfdf/";

/// Fixed `flags` attribute emitted on every annotation element.
pub(crate) const FLAGS_PRINT: &str = "print";

/// Cloud border fringe, fixed by the schema.
pub(crate) const CLOUD_FRINGE: &str = "9,9,9,9";

/// Default icon name for `text` annotations.
pub(crate) const DEFAULT_ICON: &str = "Note";

/// Schema attribute name ↔ model field name.
///
/// Applied as a pure transform in both directions; attribute maps are never
/// renamed in place. Names absent from the table pass through unchanged.
const ATTR_NAMES: &[(&str, &str)] = &[
    ("color", "stroke_color"),
    ("interior-color", "fill_color"),
    ("width", "border_width"),
    ("style", "border_style"),
    ("dashes", "border_dashes"),
    ("intensity", "border_intensity"),
];

/// Model field name for a schema attribute.
pub(crate) fn to_model_name(schema: &str) -> &str {
    ATTR_NAMES
        .iter()
        .find(|(s, _)| *s == schema)
        .map(|(_, m)| *m)
        .unwrap_or(schema)
}

/// Schema attribute name for a model field.
pub(crate) fn to_schema_name(model: &str) -> &'static str {
    ATTR_NAMES
        .iter()
        .find(|(_, m)| *m == model)
        .map(|(s, _)| *s)
        .expect("model field missing from attribute name table")
}

/// Rekey a schema-named attribute map to model field names, producing a new
/// map and leaving the source untouched.
pub(crate) fn model_attrs(attrs: &HashMap<String, String>) -> HashMap<String, String> {
    attrs
        .iter()
        .map(|(k, v)| (to_model_name(k).to_string(), v.clone()))
        .collect()
}

/// Format a coordinate, trimming to at most four decimal places and dropping
/// a trailing fraction of zeros entirely.
pub(crate) fn fmt_num(v: f32) -> String {
    if (v - v.round()).abs() < 1e-4 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a native-space point as `"x,y"` in interchange space.
pub(crate) fn fmt_point(p: Point, page_height: f32) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(flip(p.y, page_height)))
}

/// Format a native-space rectangle as `"x0,top,x1,bottom"` in interchange
/// space (the y extremes swap roles under the flip).
pub(crate) fn fmt_rect(r: &Rect, page_height: f32) -> String {
    format!(
        "{},{},{},{}",
        fmt_num(r.x0),
        fmt_num(flip(r.y1, page_height)),
        fmt_num(r.x1),
        fmt_num(flip(r.y0, page_height))
    )
}

/// Parse a comma-separated float list.
pub(crate) fn parse_floats(s: &str) -> Result<Vec<f32>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| Error::MalformedInterchange(format!("invalid number {:?}", part)))
        })
        .collect()
}

/// Parse an interchange-space `"x0,top,x1,bottom"` rectangle back into
/// native space.
pub(crate) fn parse_rect(s: &str, page_height: f32) -> Result<Rect> {
    let nums = parse_floats(s)?;
    if nums.len() != 4 {
        return Err(Error::MalformedInterchange(format!(
            "rect needs 4 numbers, got {:?}",
            s
        )));
    }
    Ok(Rect::new(
        nums[0],
        flip(nums[3], page_height),
        nums[2],
        flip(nums[1], page_height),
    ))
}

/// Parse an interchange-space `"x,y"` point back into native space.
pub(crate) fn parse_point(s: &str, page_height: f32) -> Result<Point> {
    let nums = parse_floats(s)?;
    if nums.len() != 2 {
        return Err(Error::MalformedInterchange(format!(
            "point needs 2 numbers, got {:?}",
            s
        )));
    }
    Ok(Point::new(nums[0], flip(nums[1], page_height)))
}
