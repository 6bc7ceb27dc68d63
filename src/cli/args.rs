//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::StyleArg;
use crate::config::Config;

/// Webcam avatar booth: capture a frame and turn it into an avatar
#[derive(Parser, Debug)]
#[command(name = "avatar-booth")]
#[command(version, about = "Turn a webcam snapshot into a cartoon or emoji avatar", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Avatar style (default from config, else stylize)
    #[arg(long, short)]
    pub style: Option<StyleArg>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Directory for the temporary and saved avatars
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// ONNX emotion model used by the emotion style
    #[arg(long, short)]
    pub model: Option<PathBuf>,

    /// Mirror camera horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Don't print avatar previews in the terminal
    #[arg(long)]
    pub no_preview: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merge settings: CLI args > config file > built-in defaults.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(style) = self.style {
            config.style = style.into();
        }
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if let Some(dir) = &self.output_dir {
            config.store.output_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.classifier.model = model.clone();
        }
        if self.mirror {
            config.camera.mirror = true;
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
    /// Draw the emoji avatar for an emotion label without a camera
    Render {
        /// happy, sad, neutral, angry, surprise or fear
        label: String,
        /// Output PNG (default: <label>_avatar.png in the output directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Stylize an image file
    Stylize {
        /// Input .png, .jpg or .jpeg image
        input: PathBuf,
        /// Output PNG (default: <input stem>_avatar.png in the output directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::AvatarStyle;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["avatar-booth"]);
        assert!(args.style.is_none());
        assert!(args.camera.is_none());
        assert!(args.output_dir.is_none());
        assert!(args.model.is_none());
        assert!(!args.mirror);
        assert!(!args.no_preview);
        assert!(args.config.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_args_style_values() {
        let args = Args::parse_from(["avatar-booth", "--style", "emotion"]);
        assert_eq!(args.style, Some(StyleArg::Emotion));

        let args = Args::parse_from(["avatar-booth", "-s", "stylize"]);
        assert_eq!(args.style, Some(StyleArg::Stylize));
    }

    #[test]
    fn test_args_rejects_unknown_style() {
        assert!(Args::try_parse_from(["avatar-booth", "--style", "sketch"]).is_err());
    }

    #[test]
    fn test_args_config_option() {
        let args = Args::parse_from(["avatar-booth", "-c", "/tmp/test.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_args_list_cameras_subcommand() {
        let args = Args::parse_from(["avatar-booth", "list-cameras"]);
        assert!(matches!(args.command, Some(Command::ListCameras)));
    }

    #[test]
    fn test_args_config_init_subcommand() {
        let args = Args::parse_from(["avatar-booth", "config", "init"]);
        match args.command {
            Some(Command::Config {
                action: ConfigAction::Init,
            }) => (),
            _ => panic!("Expected Config Init subcommand"),
        }
    }

    #[test]
    fn test_args_render_subcommand() {
        let args = Args::parse_from(["avatar-booth", "render", "happy", "-o", "h.png"]);
        match args.command {
            Some(Command::Render { label, output }) => {
                assert_eq!(label, "happy");
                assert_eq!(output, Some(PathBuf::from("h.png")));
            }
            _ => panic!("Expected Render subcommand"),
        }
    }

    #[test]
    fn test_args_stylize_subcommand() {
        let args = Args::parse_from(["avatar-booth", "stylize", "me.jpg"]);
        match args.command {
            Some(Command::Stylize { input, output }) => {
                assert_eq!(input, PathBuf::from("me.jpg"));
                assert!(output.is_none());
            }
            _ => panic!("Expected Stylize subcommand"),
        }
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let args = Args::parse_from([
            "avatar-booth",
            "--style",
            "emotion",
            "--camera",
            "2",
            "--output-dir",
            "/tmp/avatars",
            "--model",
            "fer.onnx",
            "--mirror",
        ]);
        let mut config = Config::default();

        args.apply_to(&mut config);

        assert_eq!(config.style, AvatarStyle::Emotion);
        assert_eq!(config.camera.device, 2);
        assert!(config.camera.mirror);
        assert_eq!(config.store.output_dir, PathBuf::from("/tmp/avatars"));
        assert_eq!(config.classifier.model, PathBuf::from("fer.onnx"));
    }

    #[test]
    fn test_apply_to_keeps_config_without_flags() {
        let args = Args::parse_from(["avatar-booth"]);
        let mut config = Config::default();
        config.camera.mirror = true;
        config.camera.device = 3;

        args.apply_to(&mut config);

        assert!(config.camera.mirror);
        assert_eq!(config.camera.device, 3);
        assert_eq!(config.style, AvatarStyle::Stylize);
    }
}
