//! Camera module: webcam access and the confirm/cancel capture loop.
//!
//! - Device enumeration via [`list_devices`]
//! - Frame sources via [`FrameSource`] and [`open_camera`]
//! - The blocking capture loop via [`capture_frame`]
//! - Configuration via [`CameraSettings`] and [`Resolution`]

mod capture_loop;
mod device;
mod frame_utils;
mod source;
mod types;

pub use capture_loop::{capture_frame, CaptureOptions, CaptureOutcome, CaptureSignal, SignalSource};
pub use device::list_devices;
pub use frame_utils::mirror_horizontal;
#[cfg(feature = "native-camera")]
pub use source::NativeCamera;
pub use source::{open_camera, FrameSource};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, Resolution};
