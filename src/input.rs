//! Terminal input: typed commands, forwarded hotkeys and Ctrl+C.
//!
//! Every input source feeds one channel of [`InputEvent`]s:
//! - a stdin reader thread sends each typed line
//! - the global hotkey listener sends confirm/cancel presses
//! - the Ctrl+C handler sends an interrupt
//!
//! [`TerminalSignals`] reads that channel both while idle (commands) and
//! while the camera is live (confirm/cancel).

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::app::Action;
use crate::camera::{CaptureSignal, SignalSource};

/// One piece of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line typed in the terminal (without the newline)
    Line(String),
    /// A bound global key was pressed
    Key(CaptureSignal),
    /// Ctrl+C
    Interrupt,
    /// stdin reached end of file
    Closed,
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Run(Action),
    Help,
    Blank,
    Unknown(String),
}

/// Parse one typed line into a command.
///
/// `load` and `save` take the rest of the line as their argument, so paths
/// and names may contain spaces. A missing argument is passed through as
/// empty and rejected by the action itself.
pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Blank;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "capture" => ShellCommand::Run(Action::Capture),
        "load" => ShellCommand::Run(Action::Load(PathBuf::from(rest))),
        "save" => ShellCommand::Run(Action::Save(rest.to_string())),
        "exit" | "quit" => ShellCommand::Run(Action::Exit),
        "help" | "?" => ShellCommand::Help,
        _ => ShellCommand::Unknown(word.to_string()),
    }
}

/// Spawn a thread that forwards stdin lines until end of file.
pub fn spawn_stdin_reader(tx: Sender<InputEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(InputEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(InputEvent::Closed);
    })
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler(tx: Sender<InputEvent>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let _ = tx.send(InputEvent::Interrupt);
    })
}

/// Character a cooked-mode terminal buffers when `key` is pressed.
fn typed_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c),
        _ if key == "space" => Some(' '),
        _ => None,
    }
}

/// The input channel seen as confirm/cancel signals.
///
/// Typed lines equal to the confirm or cancel key also count, so capture
/// works in builds or sessions without global hotkeys.
///
/// A global hotkey press is also typed into the terminal, where it waits in
/// the line buffer. With [`TerminalSignals::strip_key_echo`] on, that one
/// leading character is removed from the next typed line.
pub struct TerminalSignals {
    rx: Receiver<InputEvent>,
    confirm_key: String,
    cancel_key: String,
    closed: bool,
    strip_echo: bool,
    pending_echo: Option<char>,
}

impl TerminalSignals {
    pub fn new(rx: Receiver<InputEvent>, confirm_key: &str, cancel_key: &str) -> Self {
        Self {
            rx,
            confirm_key: confirm_key.trim().to_ascii_lowercase(),
            cancel_key: cancel_key.trim().to_ascii_lowercase(),
            closed: false,
            strip_echo: false,
            pending_echo: None,
        }
    }

    /// Drop the hotkey character a terminal echoes into the next line.
    /// Only meaningful when stdin is an interactive terminal.
    pub fn strip_key_echo(mut self, on: bool) -> Self {
        self.strip_echo = on;
        self
    }

    fn note_key(&mut self, signal: CaptureSignal) {
        if !self.strip_echo {
            return;
        }
        let key = match signal {
            CaptureSignal::Confirm => &self.confirm_key,
            CaptureSignal::Cancel => &self.cancel_key,
        };
        self.pending_echo = typed_char(key);
    }

    /// Remove a buffered hotkey character from `line`. The hotkey may have
    /// been pressed in another window, so the character is only dropped when
    /// that turns an unknown command into a known one (or a blank line).
    fn take_echo(&mut self, line: String) -> String {
        let Some(c) = self.pending_echo.take() else {
            return line;
        };
        if !line.starts_with(c) && !line.starts_with(c.to_ascii_uppercase()) {
            return line;
        }
        let rest = &line[c.len_utf8()..];
        let known = |text: &str| !matches!(parse_command(text), ShellCommand::Unknown(_));
        if !known(&line) && known(rest) {
            log::debug!("Dropped echoed hotkey {:?} from {:?}", c, line);
            rest.to_string()
        } else {
            line
        }
    }

    /// Block until the next event. `None` once every sender is gone.
    pub fn next_event(&mut self) -> Option<InputEvent> {
        if self.closed {
            return Some(InputEvent::Closed);
        }
        let event = match self.rx.recv().ok()? {
            InputEvent::Line(line) => InputEvent::Line(self.take_echo(line)),
            InputEvent::Key(signal) => {
                self.note_key(signal);
                InputEvent::Key(signal)
            }
            InputEvent::Closed => {
                self.closed = true;
                InputEvent::Closed
            }
            other => other,
        };
        Some(event)
    }

    /// Whether stdin has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn signal_for_line(&self, line: &str) -> Option<CaptureSignal> {
        let line = line.trim().to_ascii_lowercase();
        if line == self.confirm_key {
            Some(CaptureSignal::Confirm)
        } else if line == self.cancel_key {
            Some(CaptureSignal::Cancel)
        } else {
            None
        }
    }
}

impl SignalSource for TerminalSignals {
    fn poll(&mut self) -> Option<CaptureSignal> {
        loop {
            let event = match self.rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(CaptureSignal::Cancel),
            };
            match event {
                InputEvent::Key(signal) => {
                    self.note_key(signal);
                    return Some(signal);
                }
                InputEvent::Interrupt => return Some(CaptureSignal::Cancel),
                InputEvent::Closed => {
                    self.closed = true;
                    return Some(CaptureSignal::Cancel);
                }
                InputEvent::Line(line) => {
                    let line = self.take_echo(line);
                    if let Some(signal) = self.signal_for_line(&line) {
                        return Some(signal);
                    }
                    log::debug!("Ignoring input while capturing: {:?}", line);
                }
            }
        }
    }

    fn clear(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            if event == InputEvent::Closed {
                self.closed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn signals() -> (Sender<InputEvent>, TerminalSignals) {
        let (tx, rx) = mpsc::channel();
        (tx, TerminalSignals::new(rx, "c", "q"))
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("capture"), ShellCommand::Run(Action::Capture));
        assert_eq!(parse_command("  EXIT "), ShellCommand::Run(Action::Exit));
        assert_eq!(parse_command("help"), ShellCommand::Help);
        assert_eq!(parse_command("   "), ShellCommand::Blank);
    }

    #[test]
    fn test_parse_arguments_keep_spaces() {
        assert_eq!(
            parse_command("load my photos/me.jpg"),
            ShellCommand::Run(Action::Load(PathBuf::from("my photos/me.jpg")))
        );
        assert_eq!(
            parse_command("save  best avatar "),
            ShellCommand::Run(Action::Save("best avatar".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_argument() {
        assert_eq!(
            parse_command("save"),
            ShellCommand::Run(Action::Save(String::new()))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("dance now"),
            ShellCommand::Unknown("dance".to_string())
        );
    }

    #[test]
    fn test_poll_empty_channel() {
        let (_tx, mut signals) = signals();
        assert_eq!(signals.poll(), None);
    }

    #[test]
    fn test_poll_keys_and_lines() {
        let (tx, mut signals) = signals();
        tx.send(InputEvent::Line("hello".to_string())).unwrap();
        tx.send(InputEvent::Line(" C ".to_string())).unwrap();
        tx.send(InputEvent::Key(CaptureSignal::Cancel)).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Confirm));
        assert_eq!(signals.poll(), Some(CaptureSignal::Cancel));
        assert_eq!(signals.poll(), None);
    }

    #[test]
    fn test_interrupt_cancels() {
        let (tx, mut signals) = signals();
        tx.send(InputEvent::Interrupt).unwrap();
        assert_eq!(signals.poll(), Some(CaptureSignal::Cancel));
    }

    #[test]
    fn test_closed_stdin_cancels_and_sticks() {
        let (tx, mut signals) = signals();
        tx.send(InputEvent::Closed).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Cancel));
        assert!(signals.is_closed());
        assert_eq!(signals.next_event(), Some(InputEvent::Closed));
    }

    #[test]
    fn test_clear_drops_stale_input() {
        let (tx, mut signals) = signals();
        tx.send(InputEvent::Key(CaptureSignal::Confirm)).unwrap();
        tx.send(InputEvent::Line("q".to_string())).unwrap();

        signals.clear();

        assert_eq!(signals.poll(), None);
    }

    #[test]
    fn test_hotkey_echo_removed_from_next_line() {
        let (tx, rx) = mpsc::channel();
        let mut signals = TerminalSignals::new(rx, "c", "q").strip_key_echo(true);
        tx.send(InputEvent::Key(CaptureSignal::Confirm)).unwrap();
        tx.send(InputEvent::Line("csave me".to_string())).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Confirm));
        assert_eq!(
            signals.next_event(),
            Some(InputEvent::Line("save me".to_string()))
        );
    }

    #[test]
    fn test_hotkey_echo_alone_becomes_blank() {
        let (tx, rx) = mpsc::channel();
        let mut signals = TerminalSignals::new(rx, "c", "q").strip_key_echo(true);
        tx.send(InputEvent::Key(CaptureSignal::Cancel)).unwrap();
        tx.send(InputEvent::Line("Q".to_string())).unwrap();
        tx.send(InputEvent::Line("qexit".to_string())).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Cancel));
        assert_eq!(signals.next_event(), Some(InputEvent::Line(String::new())));
        // Only the one buffered character is dropped
        assert_eq!(
            signals.next_event(),
            Some(InputEvent::Line("qexit".to_string()))
        );
    }

    #[test]
    fn test_hotkey_echo_keeps_valid_commands() {
        let (tx, rx) = mpsc::channel();
        let mut signals = TerminalSignals::new(rx, "c", "q").strip_key_echo(true);
        tx.send(InputEvent::Key(CaptureSignal::Confirm)).unwrap();
        tx.send(InputEvent::Line("capture".to_string())).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Confirm));
        assert_eq!(
            signals.next_event(),
            Some(InputEvent::Line("capture".to_string()))
        );
    }

    #[test]
    fn test_hotkey_echo_off_by_default() {
        let (tx, mut signals) = signals();
        tx.send(InputEvent::Key(CaptureSignal::Confirm)).unwrap();
        tx.send(InputEvent::Line("csave me".to_string())).unwrap();

        assert_eq!(signals.poll(), Some(CaptureSignal::Confirm));
        assert_eq!(
            signals.next_event(),
            Some(InputEvent::Line("csave me".to_string()))
        );
    }

    #[test]
    fn test_disconnected_channel_cancels() {
        let (tx, mut signals) = signals();
        drop(tx);
        assert_eq!(signals.poll(), Some(CaptureSignal::Cancel));
        assert_eq!(signals.next_event(), None);
    }
}
