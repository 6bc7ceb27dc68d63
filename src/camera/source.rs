//! Frame sources: the camera device and anything else that yields frames.

use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Something that yields frames on a pull basis.
///
/// Implementations release their device when dropped, so handing a source
/// to the capture loop by value guarantees the device is closed on every
/// exit path.
pub trait FrameSource {
    /// Pull the next frame, blocking until one is available.
    fn next_frame(&mut self) -> Result<Frame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        (**self).next_frame()
    }
}

/// Webcam opened through nokhwa.
///
/// The stream is opened in [`NativeCamera::open`] and stopped on drop.
#[cfg(feature = "native-camera")]
pub struct NativeCamera {
    camera: nokhwa::Camera,
    settings: CameraSettings,
    resolution: Resolution,
}

#[cfg(feature = "native-camera")]
impl std::fmt::Debug for NativeCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeCamera")
            .field("settings", &self.settings)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "native-camera")]
impl NativeCamera {
    /// Open device `settings.device_index` and start streaming.
    ///
    /// Fails with `DeviceNotFound` for an unknown index, `PermissionDenied`
    /// when the OS refuses access, `OpenFailed` when no pixel format is
    /// accepted and `StreamFailed` when the stream will not start.
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let wanted = settings.device_index;
        if !super::device::list_devices()?.iter().any(|c| c.index == wanted) {
            return Err(CameraError::DeviceNotFound(wanted));
        }

        let mut camera = negotiate(&settings)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let negotiated = camera.resolution();
        let resolution = Resolution::new(negotiated.width(), negotiated.height());
        log::info!(
            "Camera {} streaming at {} ({} fps)",
            wanted,
            resolution,
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            settings,
            resolution,
        })
    }

    /// Resolution the camera actually negotiated.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

#[cfg(feature = "native-camera")]
impl FrameSource for NativeCamera {
    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;

        let mut frame = super::frame_utils::decode_buffer(&buffer)
            .ok_or_else(|| CameraError::ReadFailed("undecodable camera buffer".to_string()))?;
        if self.settings.mirror {
            super::frame_utils::mirror_horizontal(&mut frame);
        }
        Ok(frame)
    }
}

#[cfg(feature = "native-camera")]
impl Drop for NativeCamera {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("Camera {} did not stop cleanly: {}", self.settings.device_index, e);
        } else {
            log::debug!("Camera {} released", self.settings.device_index);
        }
    }
}

/// Open the device with the first pixel format it accepts: NV12 (native on
/// macOS), then MJPEG, then the device's own highest resolution.
#[cfg(feature = "native-camera")]
fn negotiate(settings: &CameraSettings) -> Result<nokhwa::Camera, CameraError> {
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    };

    let size = nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let near = |format| {
        RequestedFormatType::Closest(CameraFormat::new(size, format, settings.fps))
    };
    let strategies = [
        near(FrameFormat::NV12),
        near(FrameFormat::MJPEG),
        RequestedFormatType::AbsoluteHighestResolution,
    ];

    let index = CameraIndex::Index(settings.device_index);
    let mut failure = String::from("no pixel format was accepted");
    for strategy in strategies {
        let label = format!("{:?}", strategy);
        match nokhwa::Camera::new(index.clone(), RequestedFormat::new::<RgbFormat>(strategy)) {
            Ok(camera) => return Ok(camera),
            Err(e) => {
                log::debug!("Format {} rejected: {}", label, e);
                failure = e.to_string();
            }
        }
    }

    if is_permission_error(&failure) {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(failure))
    }
}

/// Backends report a refused camera grant only through the message text.
#[cfg(feature = "native-camera")]
fn is_permission_error(message: &str) -> bool {
    let message = message.to_lowercase();
    ["permission", "denied", "authoriz", "access"]
        .iter()
        .any(|word| message.contains(word))
}

/// Open the camera described by `settings`.
///
/// Builds without the `native-camera` feature always report
/// [`CameraError::Unsupported`].
pub fn open_camera(settings: CameraSettings) -> Result<Box<dyn FrameSource>, CameraError> {
    #[cfg(feature = "native-camera")]
    {
        Ok(Box::new(NativeCamera::open(settings)?))
    }
    #[cfg(not(feature = "native-camera"))]
    {
        let _ = settings;
        Err(CameraError::Unsupported)
    }
}
