//! Buffer decoding and in-place frame edits.

use super::types::Frame;

/// Decode whatever the camera delivered (MJPEG, YUYV, NV12, ...) into an
/// RGB frame. `None` for corrupt or unsupported buffers.
#[cfg(feature = "native-camera")]
pub fn decode_buffer(buffer: &nokhwa::Buffer) -> Option<Frame> {
    use nokhwa::pixel_format::RgbFormat;

    let rgb = buffer.decode_image::<RgbFormat>().ok()?;
    let size = buffer.resolution();
    Some(Frame::new(rgb.into_raw(), size.width(), size.height()))
}

/// Flip a frame left-right in place (selfie view).
pub fn mirror_horizontal(frame: &mut Frame) {
    let row_len = frame.width as usize * Frame::CHANNELS;
    if row_len == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(row_len) {
        let mut pixels: Vec<[u8; Frame::CHANNELS]> = row
            .chunks_exact(Frame::CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        pixels.reverse();
        for (dst, src) in row.chunks_exact_mut(Frame::CHANNELS).zip(pixels) {
            dst.copy_from_slice(&src);
        }
    }
}
