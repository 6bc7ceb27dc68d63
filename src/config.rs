//! Configuration file handling for avatar-booth.
//!
//! Loads configuration from `~/.config/avatar-booth/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::camera::{CameraSettings, Resolution};
use crate::transform::AvatarStyle;

/// Default location of the emotion model, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/emotion-ferplus-8.onnx";

/// Configuration file structure for avatar-booth.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub style: AvatarStyle,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            mirror: false,
        }
    }
}

impl CameraConfig {
    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.device,
            resolution: Resolution {
                width: self.width,
                height: self.height,
            },
            fps: self.fps,
            mirror: self.mirror,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_confirm_key")]
    pub confirm_key: String,
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            confirm_key: default_confirm_key(),
            cancel_key: default_cancel_key(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_model")]
    pub model: PathBuf,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

fn default_width() -> u32 {
    Resolution::HIGH.width
}

fn default_height() -> u32 {
    Resolution::HIGH.height
}

fn default_fps() -> u32 {
    30
}

fn default_confirm_key() -> String {
    "c".to_string()
}

fn default_cancel_key() -> String {
    "q".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_model() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

impl Config {
    /// Read the TOML file at `path` (or [`default_path`]).
    ///
    /// A missing file yields the built-in defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_path(),
        };
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

/// Why a config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// `<config dir>/avatar-booth/config.toml`, falling back to `~/.config`.
pub fn default_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join("avatar-booth").join("config.toml")
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# avatar-booth configuration

# Avatar style: "stylize" or "emotion"
style = "stylize"

[camera]
device = 0
width = 1280
height = 720
fps = 30
mirror = false

[capture]
# Keys pressed while the camera is live
confirm_key = "c"
cancel_key = "q"

[store]
# Where the temporary avatar and saved copies go
output_dir = "."

[classifier]
# FER+ style ONNX model used by the emotion style
model = "models/emotion-ferplus-8.onnx"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("none.toml"))).unwrap();

        assert_eq!(config.style, AvatarStyle::Stylize);
        assert_eq!(config.camera.device, 0);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.camera.height, 720);
        assert_eq!(config.capture.confirm_key, "c");
        assert_eq!(config.capture.cancel_key, "q");
        assert_eq!(config.store.output_dir, PathBuf::from("."));
        assert_eq!(config.classifier.model, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.camera.fps, 30);
        assert!(!config.camera.mirror);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "style = \"emotion\"\n[camera]\ndevice = 2\nmirror = true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.style, AvatarStyle::Emotion);
        let settings = config.camera.settings();
        assert_eq!(settings.device_index, 2);
        assert!(settings.mirror);
        assert_eq!(settings.resolution, Resolution::HIGH);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "style = [").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
