//! Subcommand handlers for list-cameras, config, render and stylize.

use std::path::{Path, PathBuf};

use super::args::ConfigAction;
use crate::app::has_loadable_extension;
use crate::camera;
use crate::config::{Config, DEFAULT_CONFIG};
use crate::emotion::{render_avatar, Emotion};
use crate::stylize::cartoonify;

/// Errors from the one-shot subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("'{}' is not a .png, .jpg or .jpeg image", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("Failed to read image '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to write config file '{}': {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), camera::CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
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
///
/// `config` is the effective configuration (file plus CLI overrides) and
/// `config_path` the file it was read from.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    config_path: &Path,
) -> Result<(), CommandError> {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Style: {}", config.style);
            println!(
                "  Camera: {} ({}x{} @ {} fps{})",
                config.camera.device,
                config.camera.width,
                config.camera.height,
                config.camera.fps,
                if config.camera.mirror { ", mirrored" } else { "" }
            );
            println!(
                "  Capture keys: '{}' confirms, '{}' cancels",
                config.capture.confirm_key, config.capture.cancel_key
            );
            println!("  Output directory: {}", config.store.output_dir.display());
            println!("  Emotion model: {}", config.classifier.model.display());
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            init_config(config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the default config file, refusing to overwrite an existing one.
fn init_config(config_path: &Path) -> Result<(), CommandError> {
    if config_path.exists() {
        return Err(CommandError::ConfigExists(config_path.to_path_buf()));
    }

    let write_err = |source| CommandError::ConfigWrite {
        path: config_path.to_path_buf(),
        source,
    };

    // Create parent directories if needed
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG).map_err(write_err)
}

/// Draw the emoji avatar for `label` and write it as PNG.
///
/// Unknown labels draw the neutral face.
pub fn render_emotion(
    label: &str,
    output: Option<PathBuf>,
    output_dir: &Path,
) -> Result<PathBuf, CommandError> {
    let emotion = Emotion::from_label(label);
    if Emotion::parse(label).is_none() {
        log::warn!("Unknown emotion '{}', drawing {}", label, emotion);
    }

    let path = output.unwrap_or_else(|| output_dir.join(format!("{}_avatar.png", emotion)));
    render_avatar(emotion)
        .save(&path)
        .map_err(|source| CommandError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Stylize an image file and write the result as PNG.
pub fn stylize_file(
    input: &Path,
    output: Option<PathBuf>,
    output_dir: &Path,
) -> Result<PathBuf, CommandError> {
    if !has_loadable_extension(input) {
        return Err(CommandError::UnsupportedInput(input.to_path_buf()));
    }

    let image = image::open(input)
        .map_err(|source| CommandError::Read {
            path: input.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let path = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        output_dir.join(format!("{}_avatar.png", stem))
    });

    log::info!("Stylizing {:?} ({}x{})", input, image.width(), image.height());
    cartoonify(&image)
        .save(&path)
        .map_err(|source| CommandError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
