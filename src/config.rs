//! Editor settings, stored as JSON next to the user's other config files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::region::{FieldKind, FieldType, TextStyle};

const APP_DIR: &str = "template-annotate";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub viewport: ViewportConfig,
    pub interaction: InteractionConfig,
    pub field_types: FieldTypeTokens,
    pub new_field: NewFieldConfig,
}

impl Config {
    /// `<config_dir>/template-annotate/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path (must exist) or from the default location
    /// (falls back to defaults when absent).
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => {
                log::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub zoom_step: f32,
    pub min_zoom: f32,
    /// Side of the square corner handles, in screen pixels.
    pub handle_size: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            min_zoom: 0.1,
            handle_size: 8.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
}

/// How a press on empty background turns into a new region instead of a pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateGesture {
    Modifier { key: ModifierKey },
    LongPress { delay_ms: u64 },
}

impl Default for CreateGesture {
    fn default() -> Self {
        CreateGesture::Modifier {
            key: ModifierKey::Shift,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub create: CreateGesture,
    /// Screen pixels a long press may wander before it becomes a pan.
    pub hold_slop: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            create: CreateGesture::default(),
            hold_slop: 4.0,
        }
    }
}

/// Wire tokens written to `field_type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTypeTokens {
    pub text: String,
    pub image: String,
    pub signature: String,
    pub stamp: String,
    pub face_photo: String,
}

impl Default for FieldTypeTokens {
    fn default() -> Self {
        Self {
            text: "testo".into(),
            image: "immagine".into(),
            signature: "firma".into(),
            stamp: "timbro".into(),
            face_photo: "foto_volto".into(),
        }
    }
}

impl FieldTypeTokens {
    pub fn token(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Text => &self.text,
            FieldKind::Image => &self.image,
            FieldKind::Signature => &self.signature,
            FieldKind::Stamp => &self.stamp,
            FieldKind::FacePhoto => &self.face_photo,
        }
    }

    pub fn kind_of(&self, token: &str) -> Option<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| self.token(*kind) == token)
    }

    pub fn token_for<'a>(&'a self, field_type: &'a FieldType) -> &'a str {
        match field_type {
            FieldType::Other(token) => token,
            other => other
                .kind()
                .map(|kind| self.token(kind))
                .unwrap_or(&self.text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewFieldConfig {
    pub name_prefix: String,
    pub style: TextStyle,
    /// `text_type` categories offered in the property form. Any other value
    /// can still be typed in.
    pub text_types: Vec<String>,
}

impl Default for NewFieldConfig {
    fn default() -> Self {
        Self {
            name_prefix: "field_".into(),
            style: TextStyle::default(),
            text_types: ["generico", "data", "citta", "nominativo"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "viewport": { "zoom_step": 0.25 },
                 "interaction": { "create": { "kind": "long_press", "delay_ms": 300 } } }"#,
        )
        .unwrap();
        assert_eq!(config.viewport.zoom_step, 0.25);
        assert_eq!(config.viewport.min_zoom, 0.1);
        assert_eq!(
            config.interaction.create,
            CreateGesture::LongPress { delay_ms: 300 }
        );
        assert_eq!(config.field_types, FieldTypeTokens::default());
        assert_eq!(config.new_field.text_types[0], "generico");
    }

    #[test]
    fn tokens_map_both_ways() {
        let tokens = FieldTypeTokens::default();
        for kind in FieldKind::ALL {
            assert_eq!(tokens.kind_of(tokens.token(kind)), Some(kind));
        }
        assert_eq!(tokens.kind_of("face"), None);
        assert_eq!(tokens.token_for(&FieldType::Other("face".into())), "face");
        assert_eq!(tokens.token_for(&FieldType::Stamp), "timbro");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/template-annotate.json")))
            .unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
