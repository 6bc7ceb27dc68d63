//! Camera discovery.

use super::types::{CameraError, CameraInfo};

/// Every camera the OS backend reports. An empty list is not an error.
#[cfg(feature = "native-camera")]
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    use nokhwa::utils::ApiBackend;

    let found =
        nokhwa::query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;
    log::debug!("Backend reported {} camera(s)", found.len());

    let cameras = found
        .iter()
        .map(|info| CameraInfo {
            index: info.index().as_index().unwrap_or_default(),
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect();
    Ok(cameras)
}

/// Builds without a camera backend see no devices.
#[cfg(not(feature = "native-camera"))]
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    Ok(Vec::new())
}
