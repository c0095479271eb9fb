use image::DynamicImage;
use std::sync::Arc;

/// One still image pulled from a live stream.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Raised by `open`. Fatal for the whole sampling loop and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
}

/// Raised for a single capture. The loop skips the cycle and tries again next tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera stream ended")]
    StreamEnded,
    #[error("camera disconnected: {0}")]
    Disconnected(String),
    #[error("frame could not be encoded: {0}")]
    Encode(String),
}

pub trait DeviceCamera: Send + Sync {
    /// Acquire a live stream. May block on a permission prompt the first time.
    fn open(&self) -> Result<Arc<dyn CameraStream + Send + Sync>, DeviceError>;
}

pub trait CameraStream: Send + Sync {
    /// Return the most recent frame available on the stream.
    fn capture_frame(&self) -> Result<Frame, CaptureError>;
}
