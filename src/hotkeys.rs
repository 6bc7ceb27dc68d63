//! Global confirm/cancel keys for the live camera.
//!
//! Uses rdev for cross-platform global key listening, so the keys work
//! without focusing the terminal and without pressing Enter.

use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::camera::CaptureSignal;
use crate::input::InputEvent;

/// Parse a key name from the config file (`"c"`, `"space"`, `"esc"`, ...).
pub fn parse_key(name: &str) -> Option<Key> {
    let name = name.trim().to_ascii_lowercase();
    let key = match name.as_str() {
        "space" => Key::Space,
        "esc" | "escape" => Key::Escape,
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        _ => {
            let mut chars = name.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            return letter_or_digit(c);
        }
    };
    Some(key)
}

fn letter_or_digit(c: char) -> Option<Key> {
    let key = match c {
        'a' => Key::KeyA,
        'b' => Key::KeyB,
        'c' => Key::KeyC,
        'd' => Key::KeyD,
        'e' => Key::KeyE,
        'f' => Key::KeyF,
        'g' => Key::KeyG,
        'h' => Key::KeyH,
        'i' => Key::KeyI,
        'j' => Key::KeyJ,
        'k' => Key::KeyK,
        'l' => Key::KeyL,
        'm' => Key::KeyM,
        'n' => Key::KeyN,
        'o' => Key::KeyO,
        'p' => Key::KeyP,
        'q' => Key::KeyQ,
        'r' => Key::KeyR,
        's' => Key::KeyS,
        't' => Key::KeyT,
        'u' => Key::KeyU,
        'v' => Key::KeyV,
        'w' => Key::KeyW,
        'x' => Key::KeyX,
        'y' => Key::KeyY,
        'z' => Key::KeyZ,
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        _ => return None,
    };
    Some(key)
}

/// Confirm and cancel key bindings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBindings {
    pub confirm: Key,
    pub cancel: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            confirm: Key::KeyC,
            cancel: Key::KeyQ,
        }
    }
}

impl KeyBindings {
    /// Build bindings from key names, falling back to the defaults for
    /// names that don't parse.
    pub fn from_names(confirm: &str, cancel: &str) -> Self {
        let defaults = Self::default();
        let confirm = parse_key(confirm).unwrap_or_else(|| {
            log::warn!("Unknown confirm key '{}', using 'c'", confirm);
            defaults.confirm
        });
        let cancel = parse_key(cancel).unwrap_or_else(|| {
            log::warn!("Unknown cancel key '{}', using 'q'", cancel);
            defaults.cancel
        });
        Self { confirm, cancel }
    }

    /// Signal bound to `key`, if any.
    pub fn signal_for(&self, key: Key) -> Option<CaptureSignal> {
        if key == self.confirm {
            Some(CaptureSignal::Confirm)
        } else if key == self.cancel {
            Some(CaptureSignal::Cancel)
        } else {
            None
        }
    }
}

/// Background listener that forwards bound key presses as input events.
pub struct HotkeyListener {
    bindings: KeyBindings,
    /// Flag to stop forwarding events
    stop_flag: Arc<AtomicBool>,
    /// Handle to the listener thread
    listener_thread: Option<JoinHandle<()>>,
}

impl HotkeyListener {
    pub fn new(bindings: KeyBindings) -> Self {
        HotkeyListener {
            bindings,
            stop_flag: Arc::new(AtomicBool::new(false)),
            listener_thread: None,
        }
    }

    /// Start listening for global key presses.
    ///
    /// Returns an error if the listener is already running.
    pub fn start(&mut self, tx: Sender<InputEvent>) -> Result<(), String> {
        if self.listener_thread.is_some() {
            return Err("Hotkey listener already running".to_string());
        }

        let bindings = self.bindings;
        let stop_flag = self.stop_flag.clone();

        let handle = thread::spawn(move || {
            let callback = move |event: Event| {
                if stop_flag.load(Ordering::SeqCst) {
                    return;
                }
                if let EventType::KeyPress(key) = event.event_type {
                    if let Some(signal) = bindings.signal_for(key) {
                        // Receiver gone means the shell has exited
                        let _ = tx.send(InputEvent::Key(signal));
                    }
                }
            };

            // Blocks until error. On macOS this requires Accessibility permissions.
            if let Err(e) = listen(callback) {
                log::warn!("Hotkey listener error: {:?}", e);
            }
        });

        self.listener_thread = Some(handle);
        log::debug!("Hotkey listener started");
        Ok(())
    }

    /// Stop forwarding key presses.
    ///
    /// rdev's `listen()` cannot be stopped, so the thread lives until the
    /// process exits.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.listener_thread = None;
    }

    pub fn is_running(&self) -> bool {
        self.listener_thread.is_some()
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letters_and_digits() {
        assert_eq!(parse_key("c"), Some(Key::KeyC));
        assert_eq!(parse_key("Q"), Some(Key::KeyQ));
        assert_eq!(parse_key("7"), Some(Key::Num7));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key("space"), Some(Key::Space));
        assert_eq!(parse_key("Esc"), Some(Key::Escape));
        assert_eq!(parse_key(" enter "), Some(Key::Return));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("cc"), None);
        assert_eq!(parse_key("?"), None);
    }

    #[test]
    fn test_bindings_fall_back_to_defaults() {
        let bindings = KeyBindings::from_names("nope", "esc");
        assert_eq!(bindings.confirm, Key::KeyC);
        assert_eq!(bindings.cancel, Key::Escape);
    }

    #[test]
    fn test_signal_for() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.signal_for(Key::KeyC), Some(CaptureSignal::Confirm));
        assert_eq!(bindings.signal_for(Key::KeyQ), Some(CaptureSignal::Cancel));
        assert_eq!(bindings.signal_for(Key::KeyX), None);
    }

    #[test]
    fn test_listener_not_running_until_started() {
        let listener = HotkeyListener::new(KeyBindings::default());
        assert!(!listener.is_running());
    }
}
