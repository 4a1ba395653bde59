//! Engine configuration.
//!
//! Every section has a `Default` and is `#[serde(default)]`, so a JSON file
//! only needs the values it overrides:
//!
//! ```json
//! { "physics": { "substeps": 4 }, "window": { "title": "Demo" } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::math::Vector3f;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub window: WindowSettings,
    pub render: RenderSettings,
    pub physics: PhysicsSettings,
    pub audio: AudioSettings,
    pub assets: AssetSettings,
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Enco".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub clear_color: Vector3f,
    pub clear_depth: f64,
    pub depth_bits: u32,
    pub stencil_bits: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: Vector3f::zero(),
            clear_depth: 1.0,
            depth_bits: 24,
            stencil_bits: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Seconds simulated per update.
    pub time_step: f64,
    /// Substeps per update.
    pub substeps: u32,
    pub gravity: Vector3f,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            substeps: 10,
            gravity: Vector3f::new(0.0, -9.81, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory textures and fonts are read from.
    pub root: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}
