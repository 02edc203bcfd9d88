//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::PalettePreset;
use crate::config::Config;

/// Parse and validate a cell size (1-64 px).
fn parse_cell_size(s: &str) -> Result<u32, String> {
    let size: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid cell size", s))?;
    if !(1..=64).contains(&size) {
        return Err(format!("Cell size must be between 1 and 64, got {}", size));
    }
    Ok(size)
}

/// Parse and validate a display rate (1-120 fps).
fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid framerate", s))?;
    if !(1..=120).contains(&fps) {
        return Err(format!("Framerate must be between 1 and 120 fps, got {}", fps));
    }
    Ok(fps)
}

/// Renders a live camera feed as coloured glyphs with motion highlighting
#[derive(Parser, Debug)]
#[command(name = "glyphcam")]
#[command(version, about = "Live camera to coloured glyphs in the terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Use a synthetic test pattern instead of a camera
    #[arg(long)]
    pub pattern: bool,

    /// Cell size in pixels (one glyph per cell)
    #[arg(long, value_parser = parse_cell_size)]
    pub cell_size: Option<u32>,

    /// Built-in glyph palette
    #[arg(long)]
    pub palette: Option<PalettePreset>,

    /// Custom glyph palette, densest first (overrides --palette)
    #[arg(long)]
    pub palette_chars: Option<String>,

    /// Green-channel change that counts as motion
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Display rate in ticks per second
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Disable selfie-view mirroring
    #[arg(long)]
    pub no_mirror: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Overlay command-line overrides on a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if let Some(size) = self.cell_size {
            config.glyph.cell_size = size;
        }
        if let Some(preset) = self.palette {
            config.glyph.palette = preset.glyphs().to_string();
        }
        if let Some(ref chars) = self.palette_chars {
            config.glyph.palette = chars.clone();
        }
        if let Some(threshold) = self.threshold {
            config.glyph.motion_threshold = threshold;
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
        if self.no_mirror {
            config.display.mirror = false;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Create default config file
    Init,
}
