//! Interactive terminal shell.
//!
//! Reads commands from the input channel, runs them through the
//! [`Pipeline`] and prints the resulting dialogs plus a preview of each new
//! avatar.

use std::io::{self, Write};

use crate::app::{Action, AppState, Devices, Effect, Pipeline};
use crate::input::{parse_command, InputEvent, ShellCommand, TerminalSignals};
use crate::preview;
use crate::transform::{AvatarStyle, AvatarTransform};

/// Presentation options for the shell.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub confirm_key: String,
    pub cancel_key: String,
    /// Print a preview of each new avatar
    pub preview: bool,
    pub preview_columns: u16,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            confirm_key: "c".to_string(),
            cancel_key: "q".to_string(),
            preview: true,
            preview_columns: preview::DEFAULT_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive booth.
pub struct Shell<T, D> {
    pipeline: Pipeline<T, D>,
    state: AppState,
    options: ShellOptions,
}

impl<T, D> Shell<T, D>
where
    T: AvatarTransform,
    D: Devices<Signals = TerminalSignals>,
{
    pub fn new(pipeline: Pipeline<T, D>, options: ShellOptions) -> Self {
        Self {
            pipeline,
            state: AppState::default(),
            options,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run until `exit`, Ctrl+C or end of input.
    pub fn run<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.print_banner(out)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(event) = self.pipeline.devices_mut().signals().next_event() else {
                break;
            };

            let flow = match event {
                InputEvent::Line(line) => match parse_command(&line) {
                    ShellCommand::Run(action) => self.dispatch(action, out)?,
                    ShellCommand::Help => {
                        self.print_help(out)?;
                        Flow::Continue
                    }
                    ShellCommand::Blank => Flow::Continue,
                    ShellCommand::Unknown(word) => {
                        writeln!(out, "Unknown command '{}'. Type 'help' for a list.", word)?;
                        Flow::Continue
                    }
                },
                // Confirm/cancel keys only matter while the camera is live
                InputEvent::Key(_) => Flow::Continue,
                InputEvent::Interrupt | InputEvent::Closed => {
                    writeln!(out)?;
                    self.dispatch(Action::Exit, out)?
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    fn dispatch<W: Write>(&mut self, action: Action, out: &mut W) -> io::Result<Flow> {
        let creates_avatar = matches!(action, Action::Capture | Action::Load(_));
        if action == Action::Capture {
            writeln!(
                out,
                "Camera is live. Press '{}' to capture or '{}' to cancel.",
                self.options.confirm_key, self.options.cancel_key
            )?;
            out.flush()?;
        }

        let transition = self.pipeline.handle(self.state.clone(), action);
        self.state = transition.state;

        let flow = match transition.effect {
            Some(Effect::Info { title, message }) => {
                writeln!(out, "[{}] {}", title, message)?;
                if creates_avatar {
                    self.print_current(out)?;
                }
                Flow::Continue
            }
            Some(Effect::Error { title, message }) => {
                writeln!(out, "[{}] {}", title, message)?;
                Flow::Continue
            }
            Some(Effect::Exit) => {
                writeln!(out, "Goodbye.")?;
                Flow::Exit
            }
            None => {
                writeln!(out, "Capture cancelled.")?;
                Flow::Continue
            }
        };

        // stdin closed while the camera was live
        if flow == Flow::Continue && self.pipeline.devices_mut().signals().is_closed() {
            return Ok(Flow::Exit);
        }
        Ok(flow)
    }

    fn print_current<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(path) = &self.state.current_avatar {
            writeln!(out, "Current avatar: {}", path.display())?;
        }
        if !self.options.preview {
            return Ok(());
        }
        match self.pipeline.store().load_current() {
            Ok(image) => {
                let thumb = preview::thumbnail(&image);
                write!(
                    out,
                    "{}",
                    preview::render_half_blocks(&thumb, self.options.preview_columns)
                )?;
            }
            Err(e) => log::warn!("Could not preview avatar: {}", e),
        }
        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let title = match self.pipeline.style() {
            AvatarStyle::Stylize => "Avatar Creator",
            AvatarStyle::Emotion => "Emotion-Based Avatar Creator",
        };
        writeln!(out, "{}", title)?;
        writeln!(
            out,
            "Avatars are written to {}",
            self.pipeline.store().dir().display()
        )?;
        self.print_help(out)
    }

    fn print_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Commands:")?;
        writeln!(out, "  capture        open the camera and take a picture")?;
        if self.pipeline.style() == AvatarStyle::Stylize {
            writeln!(out, "  load <path>    stylize a .png, .jpg or .jpeg image")?;
        }
        writeln!(out, "  save <name>    save the current avatar as <name>.png")?;
        writeln!(out, "  help           show this list")?;
        writeln!(out, "  exit           quit")?;
        writeln!(
            out,
            "While capturing: '{}' captures, '{}' cancels.",
            self.options.confirm_key, self.options.cancel_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraError, CaptureOptions, CaptureSignal, Frame, FrameSource};
    use crate::store::AvatarStore;
    use crate::transform::Stylize;
    use image::{Rgb, RgbImage};
    use std::sync::mpsc::{self, Sender};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Camera whose n-th frame read presses a key on the input channel.
    struct KeyOnRead {
        tx: Sender<InputEvent>,
        reads: usize,
        press_after: usize,
        signal: CaptureSignal,
    }

    impl FrameSource for KeyOnRead {
        fn next_frame(&mut self) -> Result<Frame, CameraError> {
            self.reads += 1;
            if self.reads == self.press_after {
                self.tx.send(InputEvent::Key(self.signal)).unwrap();
            }
            Ok(Frame::from_image(RgbImage::from_pixel(
                64,
                36,
                Rgb([120, 160, 200]),
            )))
        }
    }

    struct FakeDevices {
        tx: Sender<InputEvent>,
        signals: TerminalSignals,
        signal: CaptureSignal,
    }

    impl Devices for FakeDevices {
        type Source = KeyOnRead;
        type Signals = TerminalSignals;

        fn open_camera(&mut self) -> Result<KeyOnRead, CameraError> {
            Ok(KeyOnRead {
                tx: self.tx.clone(),
                reads: 0,
                press_after: 2,
                signal: self.signal,
            })
        }

        fn signals(&mut self) -> &mut TerminalSignals {
            &mut self.signals
        }
    }

    fn shell(
        dir: &TempDir,
        signal: CaptureSignal,
    ) -> (Sender<InputEvent>, Shell<Stylize, FakeDevices>) {
        shell_with_echo(dir, signal, false)
    }

    fn shell_with_echo(
        dir: &TempDir,
        signal: CaptureSignal,
        strip_echo: bool,
    ) -> (Sender<InputEvent>, Shell<Stylize, FakeDevices>) {
        let (tx, rx) = mpsc::channel();
        let devices = FakeDevices {
            tx: tx.clone(),
            signals: TerminalSignals::new(rx, "c", "q").strip_key_echo(strip_echo),
            signal,
        };
        let pipeline = Pipeline::new(
            Stylize,
            AvatarStore::new(dir.path(), AvatarStyle::Stylize),
            devices,
        )
        .with_capture_options(CaptureOptions {
            poll_interval: Duration::ZERO,
        });
        let options = ShellOptions {
            preview: false,
            ..ShellOptions::default()
        };
        (tx, Shell::new(pipeline, options))
    }

    fn send_lines(tx: &Sender<InputEvent>, lines: &[&str]) {
        for line in lines {
            tx.send(InputEvent::Line(line.to_string())).unwrap();
        }
    }

    #[test]
    fn test_capture_then_save() {
        let dir = TempDir::new().unwrap();
        let (tx, mut shell) = shell(&dir, CaptureSignal::Confirm);
        // Input queued before a capture starts is discarded, so queue the rest afterwards
        let mut out = Vec::new();
        shell.dispatch(Action::Capture, &mut out).unwrap();
        send_lines(&tx, &["save me", "exit"]);
        shell.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[Capture Complete] Avatar captured successfully!"));
        assert!(text.contains("[Save Complete]"));
        assert_eq!(
            std::fs::read(dir.path().join("me.png")).unwrap(),
            std::fs::read(dir.path().join("avatar_temp.png")).unwrap()
        );
    }

    #[test]
    fn test_save_after_hotkey_ignores_echoed_key() {
        let dir = TempDir::new().unwrap();
        let (tx, mut shell) = shell_with_echo(&dir, CaptureSignal::Confirm, true);
        let mut out = Vec::new();
        shell.dispatch(Action::Capture, &mut out).unwrap();
        // The terminal still holds the confirm key when the user types
        send_lines(&tx, &["csave me", "exit"]);
        shell.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Unknown command"));
        assert!(text.contains("[Save Complete]"));
        assert!(dir.path().join("me.png").is_file());
    }

    #[test]
    fn test_cancelled_capture_leaves_no_avatar() {
        let dir = TempDir::new().unwrap();
        let (_tx, mut shell) = shell(&dir, CaptureSignal::Cancel);

        let mut out = Vec::new();
        let flow = shell.dispatch(Action::Capture, &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(String::from_utf8(out).unwrap().contains("Capture cancelled."));
        assert_eq!(shell.state(), &AppState::default());
        assert!(!dir.path().join("avatar_temp.png").exists());
    }

    #[test]
    fn test_unknown_and_help_commands() {
        let dir = TempDir::new().unwrap();
        let (tx, mut shell) = shell(&dir, CaptureSignal::Confirm);
        send_lines(&tx, &["jump", "help", "", "quit"]);

        let mut out = Vec::new();
        shell.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Unknown command 'jump'"));
        assert!(text.matches("Commands:").count() >= 2);
        assert!(text.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let dir = TempDir::new().unwrap();
        let (tx, mut shell) = shell(&dir, CaptureSignal::Confirm);
        tx.send(InputEvent::Key(CaptureSignal::Confirm)).unwrap();
        tx.send(InputEvent::Closed).unwrap();

        let mut out = Vec::new();
        shell.run(&mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Goodbye."));
        assert!(!dir.path().join("avatar_temp.png").exists());
    }

    #[test]
    fn test_save_without_avatar_reports_error() {
        let dir = TempDir::new().unwrap();
        let (tx, mut shell) = shell(&dir, CaptureSignal::Confirm);
        send_lines(&tx, &["save x", "exit"]);

        let mut out = Vec::new();
        shell.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[Error] No avatar found. Please capture one first."));
        assert!(!dir.path().join("x.png").exists());
    }
}
