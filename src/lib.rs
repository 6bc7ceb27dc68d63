//! avatar-booth library crate.
//!
//! Captures a webcam frame (or loads a picture) and turns it into an avatar:
//! either a cartoon stylization or an emoji face matching the detected
//! emotion. The binary wraps these components in an interactive shell.

pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod emotion;
#[cfg(feature = "hotkeys")]
pub mod hotkeys;
pub mod input;
pub mod preview;
pub mod shell;
pub mod store;
pub mod stylize;
pub mod transform;
