use serde::{Deserialize, Serialize};

use crate::geometry::FieldRect;

/// Regions smaller than this (logical px) on either axis are dropped when a
/// draw gesture ends.
pub const MIN_REGION_SIZE: f32 = 1.0;

// ── Field Types ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|align| align.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Attributes carried only by text fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    pub text_type: String,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: String::new(),
            font_size: 12,
            font_color: DEFAULT_FONT_COLOR.into(),
            text_type: String::new(),
            text_align: TextAlign::Left,
        }
    }
}

pub const DEFAULT_FONT_COLOR: &str = "#000000";

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Image,
    Signature,
    Stamp,
    FacePhoto,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Text,
        FieldKind::Image,
        FieldKind::Signature,
        FieldKind::Stamp,
        FieldKind::FacePhoto,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Image => "Image",
            FieldKind::Signature => "Signature",
            FieldKind::Stamp => "Stamp",
            FieldKind::FacePhoto => "Face photo",
        }
    }
}

/// What a field holds. Only the text variant has a style, so a non-text
/// field can never carry stale text attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    Text(TextStyle),
    Image,
    Signature,
    Stamp,
    FacePhoto,
    /// A token this editor doesn't know, kept verbatim.
    Other(String),
}

impl FieldType {
    pub fn new(kind: FieldKind, style: TextStyle) -> Self {
        match kind {
            FieldKind::Text => FieldType::Text(style),
            FieldKind::Image => FieldType::Image,
            FieldKind::Signature => FieldType::Signature,
            FieldKind::Stamp => FieldType::Stamp,
            FieldKind::FacePhoto => FieldType::FacePhoto,
        }
    }

    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldType::Text(_) => Some(FieldKind::Text),
            FieldType::Image => Some(FieldKind::Image),
            FieldType::Signature => Some(FieldKind::Signature),
            FieldType::Stamp => Some(FieldKind::Stamp),
            FieldType::FacePhoto => Some(FieldKind::FacePhoto),
            FieldType::Other(_) => None,
        }
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match self {
            FieldType::Text(style) => Some(style),
            _ => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match self {
            FieldType::Text(style) => Some(style),
            _ => None,
        }
    }

    /// Switch kind. A text field keeps its style when "re-selected" as text;
    /// any other switch to text starts from `default_style`.
    pub fn retype(&mut self, kind: FieldKind, default_style: &TextStyle) {
        if self.kind() == Some(kind) {
            return;
        }
        *self = FieldType::new(kind, default_style.clone());
    }
}

// ── Regions ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    id: RegionId,
    pub name: String,
    pub field_type: FieldType,
    pub rect: FieldRect,
}

impl Region {
    pub(crate) fn new(id: RegionId, name: String, field_type: FieldType, rect: FieldRect) -> Self {
        Self {
            id,
            name,
            field_type,
            rect,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }
}

/// Regions in paint order (later entries draw on top and export last).
#[derive(Clone, Debug, Default)]
pub struct RegionList {
    regions: Vec<Region>,
    next_id: u64,
}

impl RegionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt regions produced by the codec, continuing ids after the largest.
    pub(crate) fn from_regions(regions: Vec<Region>) -> Self {
        let next_id = regions.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        Self { regions, next_id }
    }

    pub(crate) fn sequential_id(index: usize) -> RegionId {
        RegionId(index as u64)
    }

    pub fn add(&mut self, name: impl Into<String>, field_type: FieldType, rect: FieldRect) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions
            .push(Region::new(id, name.into(), field_type, rect));
        id
    }

    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let index = self.index_of(id)?;
        Some(self.regions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn index_of(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    /// Move the region at `from` so it ends up at index `to`. Everything else
    /// keeps its relative order.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.regions.len() || to >= self.regions.len() {
            return false;
        }
        if from != to {
            let region = self.regions.remove(from);
            self.regions.insert(to, region);
        }
        true
    }

    /// First `<prefix><n>` not already used as a name, starting at the list length.
    pub fn unique_name(&self, prefix: &str) -> String {
        (self.regions.len()..)
            .map(|n| format!("{prefix}{n}"))
            .find(|name| self.regions.iter().all(|r| &r.name != name))
            .unwrap_or_else(|| prefix.to_owned())
    }
}

impl<'a> IntoIterator for &'a RegionList {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
