//! Key-value persistence for settings and presets.
//!
//! Everything is stored as pretty-printed JSON files in one directory, read
//! fresh on each access. Read failures degrade to defaults (a missing or
//! corrupt file should never brick the editor); write failures surface as
//! [`StoreError`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compose::frame::FrameVariant;
use crate::compose::patterns::PatternKind;
use crate::error::StoreError;
use crate::state::style::StyleState;

/// AI image presets beyond this count evict the oldest.
pub const MAX_AI_PRESETS: usize = 20;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Models offered in the settings UI: (id, label).
pub const AVAILABLE_MODELS: [(&str, &str); 2] = [
    ("gemini-3-pro-image-preview", "Gemini 3 Pro Image Preview"),
    ("gemini-2.5-flash-image", "Gemini 2.5 Flash Image"),
];

const SETTINGS_FILE: &str = "settings.json";
const STYLE_PRESETS_FILE: &str = "style_presets.json";
const AI_PRESETS_FILE: &str = "ai_presets.json";

/// Generation-service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Settings {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// A named capture of the style controls worth re-applying later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub id: Uuid,
    pub name: String,
    pub padding: f32,
    pub image_radius: f32,
    pub shadow: u8,
    pub rotate_z: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub gradient_index: usize,
    pub pattern: PatternKind,
    pub frame: FrameVariant,
}

impl StylePreset {
    pub fn capture(name: impl Into<String>, style: &StyleState) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            padding: style.padding(),
            image_radius: style.image_radius(),
            shadow: style.shadow(),
            rotate_z: style.rotate_z(),
            tilt_x: style.tilt_x(),
            tilt_y: style.tilt_y(),
            gradient_index: style.gradient_index(),
            pattern: style.pattern(),
            frame: style.frame(),
        }
    }

    /// Re-apply through the setters so stored values are re-clamped.
    pub fn apply(&self, style: &mut StyleState) {
        style.set_padding(self.padding);
        style.set_image_radius(self.image_radius);
        style.set_shadow(self.shadow);
        style.set_rotate_z(self.rotate_z);
        style.set_tilt_x(self.tilt_x);
        style.set_tilt_y(self.tilt_y);
        style.set_gradient_index(self.gradient_index);
        style.set_pattern(self.pattern);
        style.set_frame(self.frame);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiPresetKind {
    Background,
    Ui,
    Other,
}

/// A generated image worth keeping: the prompt that made it plus the PNG
/// payload, base64-encoded for JSON storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPreset {
    pub id: Uuid,
    pub name: String,
    pub prompt: String,
    pub image_png_base64: String,
    pub kind: AiPresetKind,
    pub created_at: u64,
}

impl AiPreset {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        image_png_base64: String,
        kind: AiPresetKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            prompt: prompt.into(),
            image_png_base64,
            kind,
            created_at: unix_now(),
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// File-backed store for settings and presets.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location next to the user's other app data.
    pub fn default_location() -> Self {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| Path::new(&h).join(".local/share")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("screengloss"))
    }

    pub fn settings(&self) -> Settings {
        self.read_or_default(SETTINGS_FILE)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write_json(SETTINGS_FILE, settings)
    }

    pub fn style_presets(&self) -> Vec<StylePreset> {
        self.read_or_default(STYLE_PRESETS_FILE)
    }

    /// Insert or replace by id.
    pub fn save_style_preset(&self, preset: StylePreset) -> Result<(), StoreError> {
        let mut presets = self.style_presets();
        match presets.iter_mut().find(|p| p.id == preset.id) {
            Some(slot) => *slot = preset,
            None => presets.push(preset),
        }
        self.write_json(STYLE_PRESETS_FILE, &presets)
    }

    pub fn delete_style_preset(&self, id: Uuid) -> Result<(), StoreError> {
        let mut presets = self.style_presets();
        presets.retain(|p| p.id != id);
        self.write_json(STYLE_PRESETS_FILE, &presets)
    }

    /// Newest first.
    pub fn ai_presets(&self) -> Vec<AiPreset> {
        self.read_or_default(AI_PRESETS_FILE)
    }

    /// Insert at the front and trim to [`MAX_AI_PRESETS`]; the oldest
    /// entries fall off the end.
    pub fn save_ai_preset(&self, preset: AiPreset) -> Result<(), StoreError> {
        let mut presets = self.ai_presets();
        presets.insert(0, preset);
        presets.truncate(MAX_AI_PRESETS);
        self.write_json(AI_PRESETS_FILE, &presets)
    }

    pub fn delete_ai_preset(&self, id: Uuid) -> Result<(), StoreError> {
        let mut presets = self.ai_presets();
        presets.retain(|p| p.id != id);
        self.write_json(AI_PRESETS_FILE, &presets)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("ignoring corrupt store file {}: {err}", path.display());
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), json)?;
        Ok(())
    }
}
