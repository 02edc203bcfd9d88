//! Configuration file handling for glyphcam.
//!
//! Loads configuration from `<config dir>/glyphcam/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::camera::{CameraSettings, Resolution};
use crate::glyph::{
    Palette, Rgb, Tint, ZoneScheme, DEFAULT_BRIGHTNESS_FLOOR, DEFAULT_MOTION_THRESHOLD,
    DEFAULT_PALETTE,
};
use crate::presenter::DEFAULT_CHAR_ASPECT;
use crate::transcoder::{
    TranscoderSettings, DEFAULT_CELL_SIZE, DEFAULT_MOVING_OPACITY, DEFAULT_STATIC_OPACITY,
};

/// Configuration file structure for glyphcam.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub glyph: GlyphConfig,
    pub zones: ZoneConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            width: Resolution::LOW.width,
            height: Resolution::LOW.height,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlyphConfig {
    pub cell_size: u32,
    pub palette: String,
    pub motion_threshold: u8,
    pub brightness_floor: f32,
    pub moving_opacity: f32,
    pub static_opacity: f32,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            palette: DEFAULT_PALETTE.to_string(),
            motion_threshold: DEFAULT_MOTION_THRESHOLD,
            brightness_floor: DEFAULT_BRIGHTNESS_FLOOR,
            moving_opacity: DEFAULT_MOVING_OPACITY,
            static_opacity: DEFAULT_STATIC_OPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    pub top_hue: f32,
    pub top_saturation: f32,
    pub emblem_hue: f32,
    pub emblem_saturation: f32,
    pub bottom_hue: f32,
    pub bottom_saturation: f32,
    pub min_lightness: f32,
    pub max_lightness: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        let s = ZoneScheme::DEFAULT;
        Self {
            top_hue: s.top.hue,
            top_saturation: s.top.saturation,
            emblem_hue: s.emblem.hue,
            emblem_saturation: s.emblem.saturation,
            bottom_hue: s.bottom.hue,
            bottom_saturation: s.bottom.saturation,
            min_lightness: s.min_lightness,
            max_lightness: s.max_lightness,
        }
    }
}

impl ZoneConfig {
    pub fn scheme(&self) -> ZoneScheme {
        ZoneScheme {
            top: Tint::new(self.top_hue, self.top_saturation),
            emblem: Tint::new(self.emblem_hue, self.emblem_saturation),
            neutral: ZoneScheme::DEFAULT.neutral,
            bottom: Tint::new(self.bottom_hue, self.bottom_saturation),
            min_lightness: self.min_lightness,
            max_lightness: self.max_lightness,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Selfie view: reverse column order, keep glyphs upright
    pub mirror: bool,
    pub background: [u8; 3],
    /// Ticks per second
    pub fps: u32,
    /// Height to width ratio of a terminal character cell
    pub char_aspect: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mirror: true,
            background: [0, 0, 0],
            fps: 30,
            char_aspect: DEFAULT_CHAR_ASPECT,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// With `None`, reads the default location and falls back to built-in
    /// defaults if that file doesn't exist. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::read(path)
            }
            None => {
                let path = default_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    log::debug!("No config at {}, using defaults", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build validated transcoder settings from this configuration.
    pub fn transcoder_settings(&self) -> Result<TranscoderSettings, ConfigError> {
        let palette = Palette::new(&self.glyph.palette)
            .map_err(|e| ConfigError::invalid("glyph.palette", e.to_string()))?;
        let settings = TranscoderSettings {
            cell_size: self.glyph.cell_size,
            palette,
            motion_threshold: self.glyph.motion_threshold,
            brightness_floor: self.glyph.brightness_floor,
            scheme: self.zones.scheme(),
            moving_opacity: self.glyph.moving_opacity,
            static_opacity: self.glyph.static_opacity,
            background: Rgb::from(self.display.background),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn camera_settings(&self) -> Result<CameraSettings, ConfigError> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::invalid(
                "camera.width",
                "resolution must be greater than 0",
            ));
        }
        Ok(CameraSettings {
            device_index: self.camera.device,
            resolution: Resolution {
                width: self.camera.width,
                height: self.camera.height,
            },
            fps: self.camera.fps,
        })
    }

    /// Validated display tick rate.
    pub fn display_fps(&self) -> Result<u32, ConfigError> {
        if !(1..=120).contains(&self.display.fps) {
            return Err(ConfigError::invalid(
                "display.fps",
                "must be between 1 and 120",
            ));
        }
        Ok(self.display.fps)
    }

    /// Validated character cell aspect ratio.
    pub fn char_aspect(&self) -> Result<f32, ConfigError> {
        let aspect = self.display.char_aspect;
        if !(aspect > 0.0 && aspect <= 4.0) {
            return Err(ConfigError::invalid(
                "display.char_aspect",
                "must be greater than 0 and at most 4",
            ));
        }
        Ok(aspect)
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphcam").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphcam/config.toml")
        })
}

/// Commented default configuration written by `glyphcam config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# glyphcam configuration

[camera]
# Camera device index (see `glyphcam list-cameras`)
device = 0
# Capture resolution (lower = faster, fewer cells)
width = 320
height = 240
fps = 30

[glyph]
# Cell edge length in pixels; one glyph per cell
cell_size = 4
# Glyphs from densest to sparsest; bright samples pick dense glyphs
palette = "@%#*+=-:,. "
# Green-channel change that marks a cell as moving
motion_threshold = 8
# Cells at or below this average brightness are not drawn
brightness_floor = 15.0
moving_opacity = 1.0
static_opacity = 0.3

[zones]
top_hue = 30.0
top_saturation = 100.0
emblem_hue = 240.0
emblem_saturation = 100.0
bottom_hue = 120.0
bottom_saturation = 80.0
min_lightness = 30.0
max_lightness = 80.0

[display]
# Selfie view
mirror = true
background = [0, 0, 0]
fps = 30
# Character cell height / width, used to keep the picture's proportions
char_aspect = 2.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_toml_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[glyph]\ncell_size = 8\n").unwrap();
        assert_eq!(parsed.glyph.cell_size, 8);
        assert_eq!(parsed.glyph.palette, DEFAULT_PALETTE);
        assert_eq!(parsed.display, DisplayConfig::default());
    }

    #[test]
    fn test_transcoder_settings_from_defaults() {
        let settings = Config::default().transcoder_settings().unwrap();
        assert_eq!(settings, TranscoderSettings::default());
    }

    #[test]
    fn test_short_palette_fails_fast() {
        let mut config = Config::default();
        config.glyph.palette = "@".to_string();
        match config.transcoder_settings() {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "glyph.palette"),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_display_fps_range() {
        let mut config = Config::default();
        assert_eq!(config.display_fps().unwrap(), 30);
        config.display.fps = 0;
        assert!(config.display_fps().is_err());
    }

    #[test]
    fn test_char_aspect_range() {
        let mut config = Config::default();
        assert_eq!(config.char_aspect().unwrap(), 2.0);
        config.display.char_aspect = 0.0;
        assert!(config.char_aspect().is_err());
        config.display.char_aspect = f32::NAN;
        assert!(config.char_aspect().is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("glyphcam/config.toml"));
    }
}
