//! YAML field documents.
//!
//! ```yaml
//! template: fronte.jpeg
//! fields:
//!   surname:
//!     x_left: 120
//!     y_top: 48
//!     width: 300
//!     height: 24
//!     field_type: testo
//!     font: Arial
//!     font_size: 12
//!     font_color: '#000000'
//!     text_type: generico
//!     text_align: left
//!   signature:
//!     x_left: 40
//!     y_top: 400
//!     width: 200
//!     height: 60
//!     field_type: firma
//! ```
//!
//! Decoding never fails: missing values take defaults and an unreadable
//! document yields no fields. Encoding keys fields by name, so the last
//! region with a given name wins.

use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::config::FieldTypeTokens;
use crate::geometry::FieldRect;
use crate::region::{FieldType, Region, RegionList, TextAlign, TextStyle, DEFAULT_FONT_COLOR};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub template: Option<String>,
    pub regions: Vec<Region>,
}

// ── Decode ──────────────────────────────────────────────────────────────────

pub fn decode(text: &str, tokens: &FieldTypeTokens) -> Vec<Region> {
    decode_document(text, tokens).regions
}

pub fn decode_document(text: &str, tokens: &FieldTypeTokens) -> Document {
    let root: Value = match serde_yaml::from_str(text) {
        Ok(root) => root,
        Err(err) => {
            log::warn!("unreadable field document, starting empty: {err}");
            return Document::default();
        }
    };
    let template = root
        .get("template")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let Some(fields) = root.get("fields").and_then(Value::as_mapping) else {
        log::warn!("field document has no `fields` mapping");
        return Document {
            template,
            regions: Vec::new(),
        };
    };

    let regions = fields
        .iter()
        .filter_map(|(key, record)| {
            let name = field_name(key);
            if name.is_none() {
                log::warn!("skipping field with non-scalar name {key:?}");
            }
            Some((name?, record))
        })
        .enumerate()
        .map(|(index, (name, record))| decode_field(index, name, record, tokens))
        .collect();

    Document { template, regions }
}

fn decode_field(index: usize, name: String, record: &Value, tokens: &FieldTypeTokens) -> Region {
    if !record.is_mapping() {
        log::warn!("field `{name}` is not a mapping, using defaults");
    }
    let rect = FieldRect::new(
        number(record, "x_left").unwrap_or(0.0) as f32,
        number(record, "y_top").unwrap_or(0.0) as f32,
        number(record, "width").unwrap_or(0.0) as f32,
        number(record, "height").unwrap_or(0.0) as f32,
    );

    let field_type = match string(record, "field_type").filter(|t| !t.is_empty()) {
        None => FieldType::Text(decode_text_style(record)),
        Some(token) => match tokens.kind_of(&token) {
            Some(kind) => FieldType::new(kind, decode_text_style(record)),
            None => {
                log::warn!("field `{name}` has unknown type `{token}`, keeping it as is");
                FieldType::Other(token)
            }
        },
    };

    Region::new(RegionList::sequential_id(index), name, field_type, rect)
}

fn decode_text_style(record: &Value) -> TextStyle {
    TextStyle {
        font: string(record, "font").unwrap_or_default(),
        font_size: number(record, "font_size")
            .map(|size| size.round().max(0.0) as u32)
            .unwrap_or(0),
        font_color: string(record, "font_color")
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_FONT_COLOR.to_owned()),
        text_type: string(record, "text_type").unwrap_or_default(),
        text_align: string(record, "text_align")
            .and_then(|a| TextAlign::parse(&a))
            .unwrap_or_default(),
    }
}

fn field_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Encode ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DocumentRecord<'a> {
    template: &'a str,
    fields: Mapping,
}

#[derive(Serialize)]
struct FieldRecord<'a> {
    x_left: i64,
    y_top: i64,
    width: i64,
    height: i64,
    field_type: &'a str,
    #[serde(flatten)]
    text: Option<&'a TextStyle>,
}

/// Round half away from zero.
fn round_px(v: f32) -> i64 {
    v.round() as i64
}

pub fn encode(template: &str, regions: &[Region], tokens: &FieldTypeTokens) -> serde_yaml::Result<String> {
    let mut fields = Mapping::new();
    for region in regions {
        let record = FieldRecord {
            x_left: round_px(region.rect.left),
            y_top: round_px(region.rect.top),
            width: round_px(region.rect.width),
            height: round_px(region.rect.height),
            field_type: tokens.token_for(&region.field_type),
            text: region.field_type.text_style(),
        };
        // An existing name keeps its position and takes the later value.
        fields.insert(Value::String(region.name.clone()), serde_yaml::to_value(&record)?);
    }
    serde_yaml::to_string(&DocumentRecord { template, fields })
}

/// Export file name for an image: its base name with a `.yaml` extension.
pub fn suggested_file_name(image_name: &str) -> String {
    let base = Path::new(image_name)
        .file_name()
        .map(|name| Path::new(name).with_extension("yaml"));
    match base {
        Some(path) => path.to_string_lossy().into_owned(),
        None => "fields.yaml".to_owned(),
    }
}
