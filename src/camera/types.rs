//! Shared camera types: devices, capture settings and frames.

use image::RgbImage;
use std::fmt;

/// A camera as reported by the OS backend.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Requested or negotiated capture size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 640x480, used by the hardware tests
    pub const MEDIUM: Resolution = Resolution::new(640, 480);

    /// 1280x720, what the booth asks for by default
    pub const HIGH: Resolution = Resolution::new(1280, 720);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HIGH
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One RGB raster, row-major, 3 bytes per pixel.
///
/// Frames are short-lived: the capture loop owns each one until it is
/// confirmed and handed to a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap an already decoded image (e.g. a picture loaded from disk).
    pub fn from_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    /// Copy the frame into an `RgbImage`; `None` if the buffer is the wrong size.
    pub fn to_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// How to open the camera.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub device_index: u32,
    /// Requested size; the device may pick the closest it supports
    pub resolution: Resolution,
    pub fps: u32,
    /// Flip frames left-right (selfie view)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::HIGH,
            fps: 30,
            mirror: false,
        }
    }
}

/// Device-unavailable errors: anything that stops the booth from getting a
/// frame out of the camera.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Could not list cameras: {0}")]
    QueryFailed(String),

    #[error("Could not open camera: {0}")]
    OpenFailed(String),

    #[error("Camera access denied. On macOS, allow it in System Settings > Privacy & Security > Camera")]
    PermissionDenied,

    #[error("No camera with index {0}. Run 'avatar-booth list-cameras' to see what is connected")]
    DeviceNotFound(u32),

    #[error("Could not start the camera stream: {0}")]
    StreamFailed(String),

    #[error("Could not read a camera frame: {0}")]
    ReadFailed(String),

    #[error("This build has no camera support")]
    Unsupported,
}
