//! Application settings loaded from `app_settings.toml`.
//!
//! Every key is optional. Missing keys, a missing file, or a file that fails to parse all
//! fall back to the defaults, so the application always starts.
//!
//! ```toml
//! appname = "Terramaze"
//! antialiasing_enabled = true
//! antialiasing_level = 4
//! resource_path = "resources/"
//!
//! [default_resolution]
//! x = 1024
//! y = 768
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the settings file, relative to the working directory.
pub const SETTINGS_FILE: &str = "app_settings.toml";

/// Sample count used whenever multisampling is enabled.
pub const MSAA_SAMPLES: u32 = 4;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Initial window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    /// Width.
    pub x: u32,
    /// Height.
    pub y: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self { x: 800, y: 600 }
    }
}

/// Every user-tunable setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Window title prefix.
    pub appname: String,
    /// Initial window size.
    pub default_resolution: Resolution,
    /// Request multisampling.
    pub antialiasing_enabled: bool,
    /// Requested sample count; only `2..=8` counts as valid.
    pub antialiasing_level: u32,
    /// Root of every asset directory below.
    pub resource_path: String,
    /// Shader directory under `resource_path`.
    pub shader_dir: String,
    /// Texture directory under `resource_path`.
    pub texture_dir: String,
    /// Model directory under `resource_path`.
    pub object_dir: String,
    /// Where maze snapshots are written. Not prefixed with `resource_path`.
    pub maze_save_dir: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            appname: "default".to_string(),
            default_resolution: Resolution::default(),
            antialiasing_enabled: false,
            antialiasing_level: 1,
            resource_path: "resources/".to_string(),
            shader_dir: "shaders/".to_string(),
            texture_dir: "textures/".to_string(),
            object_dir: "objects/".to_string(),
            maze_save_dir: "saved-mazes/".to_string(),
        }
    }
}

impl AppSettings {
    /// Parses settings from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses the settings file at `path`.
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`] if it is not
    /// valid TOML or a key has the wrong type.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Like [`AppSettings::load`], but logs the failure and returns defaults instead.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} not found, using default settings", path.display());
                Self::default()
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}. Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// MSAA sample count to render with, or `None` for no multisampling.
    ///
    /// Multisampling is used only when enabled with a level in `2..=8`. Every backend
    /// supports 4 samples, so any accepted level is mapped to [`MSAA_SAMPLES`].
    pub fn antialiasing_samples(&self) -> Option<u32> {
        if !self.antialiasing_enabled {
            return None;
        }
        if !(2..=8).contains(&self.antialiasing_level) {
            log::warn!(
                "Antialiasing level {} is outside 2..=8, antialiasing disabled",
                self.antialiasing_level
            );
            return None;
        }
        if self.antialiasing_level != MSAA_SAMPLES {
            log::warn!(
                "Antialiasing level {} not supported, using {MSAA_SAMPLES}",
                self.antialiasing_level
            );
        }
        Some(MSAA_SAMPLES)
    }

    /// Path of a shader file.
    pub fn shader_path(&self, file: &str) -> PathBuf {
        self.resource_dir(&self.shader_dir).join(file)
    }

    /// Path of a texture file.
    pub fn texture_path(&self, file: &str) -> PathBuf {
        self.resource_dir(&self.texture_dir).join(file)
    }

    /// Path of a model file.
    pub fn object_path(&self, file: &str) -> PathBuf {
        self.resource_dir(&self.object_dir).join(file)
    }

    /// Directory for maze snapshots.
    pub fn maze_save_dir(&self) -> PathBuf {
        PathBuf::from(&self.maze_save_dir)
    }

    fn resource_dir(&self, sub: &str) -> PathBuf {
        Path::new(&self.resource_path).join(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = AppSettings::from_toml("").expect("empty toml is valid");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.default_resolution, Resolution { x: 800, y: 600 });
        assert_eq!(settings.antialiasing_samples(), None);
    }

    /// Present keys override defaults; the rest stay untouched.
    #[test]
    fn test_partial_file() {
        let settings = AppSettings::from_toml(
            "appname = \"Terramaze\"\n[default_resolution]\nx = 1024\n",
        )
        .expect("valid toml");
        assert_eq!(settings.appname, "Terramaze");
        assert_eq!(settings.default_resolution, Resolution { x: 1024, y: 600 });
        assert_eq!(settings.texture_dir, "textures/");
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = AppSettings::from_toml("antialiasing_level = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("definitely/not/here/app_settings.toml");
        assert!(matches!(AppSettings::load(path), Err(ConfigError::Io(_))));
        assert_eq!(AppSettings::load_or_default(path), AppSettings::default());
    }

    #[test]
    fn test_antialiasing_levels() {
        let with_level = |enabled, level| AppSettings {
            antialiasing_enabled: enabled,
            antialiasing_level: level,
            ..Default::default()
        };
        assert_eq!(with_level(true, 4).antialiasing_samples(), Some(4));
        assert_eq!(with_level(true, 8).antialiasing_samples(), Some(4));
        assert_eq!(with_level(true, 2).antialiasing_samples(), Some(4));
        assert_eq!(with_level(true, 1).antialiasing_samples(), None);
        assert_eq!(with_level(true, 9).antialiasing_samples(), None);
        assert_eq!(with_level(false, 4).antialiasing_samples(), None);
    }

    #[test]
    fn test_resource_paths() {
        let settings = AppSettings::default();
        assert_eq!(
            settings.texture_path("box_rgb888.png"),
            PathBuf::from("resources/textures/box_rgb888.png")
        );
        assert_eq!(
            settings.shader_path("tex.vert.wgsl"),
            PathBuf::from("resources/shaders/tex.vert.wgsl")
        );
        assert_eq!(settings.maze_save_dir(), PathBuf::from("saved-mazes/"));
    }
}
