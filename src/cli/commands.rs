//! Subcommand handlers for list-cameras and config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::camera;
use crate::config::{default_path, Config, DEFAULT_CONFIG_TOML};

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), camera::CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("Use --pattern to run with a synthetic test pattern.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    explicit_path: Option<&Path>,
) -> Result<(), String> {
    let config_path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Camera: {}", config.camera.device);
            println!(
                "  Resolution: {}x{} @ {} fps",
                config.camera.width, config.camera.height, config.camera.fps
            );
            println!("  Cell size: {} px", config.glyph.cell_size);
            println!("  Palette: {:?}", config.glyph.palette);
            println!("  Motion threshold: {}", config.glyph.motion_threshold);
            println!("  Brightness floor: {}", config.glyph.brightness_floor);
            println!(
                "  Opacity: moving {} / static {}",
                config.glyph.moving_opacity, config.glyph.static_opacity
            );
            println!(
                "  Lightness: {}-{}",
                config.zones.min_lightness, config.zones.max_lightness
            );
            println!(
                "  Mirror: {}",
                if config.display.mirror { "yes" } else { "no" }
            );
            println!("  Display rate: {} fps", config.display.fps);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => init_config(&config_path),
    }
}

/// Write the commented default config, refusing to overwrite.
pub fn init_config(config_path: &Path) -> Result<(), String> {
    if config_path.exists() {
        return Err(format!(
            "Config file already exists: {}\nUse 'glyphcam config show' to view current settings.",
            config_path.display()
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating config directory: {}", e))?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG_TOML)
        .map_err(|e| format!("Error writing config file: {}", e))?;

    println!("Created config file: {}", config_path.display());
    Ok(())
}
