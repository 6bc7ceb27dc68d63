use clap::Parser;
use std::io;
use std::sync::mpsc;

use avatar_booth::app::{LiveDevices, Pipeline};
use avatar_booth::cli::{self, Args, Command};
use avatar_booth::config::{self, Config};
use avatar_booth::emotion::load_classifier;
#[cfg(feature = "hotkeys")]
use avatar_booth::hotkeys::{HotkeyListener, KeyBindings};
use avatar_booth::input::{self, InputEvent, TerminalSignals};
use avatar_booth::shell::{Shell, ShellOptions};
use avatar_booth::store::AvatarStore;
use avatar_booth::transform::{AvatarStyle, AvatarTransform, EmotionAvatar, Stylize};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::default_path);
    let mut cfg = match Config::load(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply_to(&mut cfg);

    let result = match args.command {
        Some(Command::ListCameras) => cli::list_cameras().map_err(|e| e.to_string()),
        Some(Command::Config { action }) => {
            cli::handle_config_action(action, &cfg, &config_path).map_err(|e| e.to_string())
        }
        Some(Command::Render { label, output }) => {
            cli::render_emotion(&label, output, &cfg.store.output_dir)
                .map(|path| println!("Wrote {}", path.display()))
                .map_err(|e| e.to_string())
        }
        Some(Command::Stylize { input, output }) => {
            cli::stylize_file(&input, output, &cfg.store.output_dir)
                .map(|path| println!("Wrote {}", path.display()))
                .map_err(|e| e.to_string())
        }
        None => run_booth(&cfg, !args.no_preview),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run the interactive booth until the user exits.
fn run_booth(cfg: &Config, preview: bool) -> Result<(), String> {
    let (tx, rx) = mpsc::channel::<InputEvent>();

    input::setup_ctrlc_handler(tx.clone())
        .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    #[cfg(feature = "hotkeys")]
    let hotkeys = start_hotkeys(cfg, tx.clone());
    #[cfg(feature = "hotkeys")]
    let echoes_hotkeys = hotkeys.is_some() && io::IsTerminal::is_terminal(&io::stdin());
    #[cfg(not(feature = "hotkeys"))]
    let echoes_hotkeys = false;

    input::spawn_stdin_reader(tx);

    let transform: Box<dyn AvatarTransform> = match cfg.style {
        AvatarStyle::Stylize => Box::new(Stylize),
        AvatarStyle::Emotion => Box::new(EmotionAvatar::new(load_classifier(
            &cfg.classifier.model,
        ))),
    };
    let signals = TerminalSignals::new(rx, &cfg.capture.confirm_key, &cfg.capture.cancel_key)
        .strip_key_echo(echoes_hotkeys);
    let devices = LiveDevices::new(cfg.camera.settings(), signals);
    let store = AvatarStore::new(&cfg.store.output_dir, cfg.style);

    log::info!(
        "Starting {} booth (camera {}, output {:?})",
        cfg.style,
        cfg.camera.device,
        cfg.store.output_dir
    );

    let options = ShellOptions {
        confirm_key: cfg.capture.confirm_key.clone(),
        cancel_key: cfg.capture.cancel_key.clone(),
        preview,
        ..ShellOptions::default()
    };
    let mut shell = Shell::new(Pipeline::new(transform, store, devices), options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    shell.run(&mut out).map_err(|e| e.to_string())
}

/// Start the global confirm/cancel key listener.
///
/// Typed confirm/cancel lines still work when this fails.
#[cfg(feature = "hotkeys")]
fn start_hotkeys(cfg: &Config, tx: mpsc::Sender<InputEvent>) -> Option<HotkeyListener> {
    let bindings = KeyBindings::from_names(&cfg.capture.confirm_key, &cfg.capture.cancel_key);
    let mut listener = HotkeyListener::new(bindings);
    match listener.start(tx) {
        Ok(()) => Some(listener),
        Err(e) => {
            log::warn!("Global hotkeys unavailable: {}", e);
            None
        }
    }
}
