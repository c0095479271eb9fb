use crate::device_camera::interface::{CaptureError, Frame};
use image::codecs::jpeg::JpegEncoder;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Compressed bytes of one frame, owned by the dispatch that sends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Lossy-encode a frame. Consumes it so it is dropped as soon as the bytes exist.
pub fn encode_jpeg(frame: Frame, quality: u8) -> Result<EncodedImage, CaptureError> {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(CaptureError::Encode(format!(
            "frame has no pixels ({}x{})",
            width, height
        )));
    }

    // JPEG has no alpha channel.
    let rgb = frame.image().to_rgb8();
    drop(frame);

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    Ok(EncodedImage {
        bytes,
        width,
        height,
        content_type: JPEG_CONTENT_TYPE,
    })
}
