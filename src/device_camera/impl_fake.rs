use crate::device_camera::interface::{CameraStream, CaptureError, DeviceCamera, DeviceError, Frame};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
    fail_open: bool,
    fail_every: Option<u64>,
    opens: AtomicU64,
    captures: Arc<AtomicU64>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            width: 64,
            height: 48,
            fail_open: false,
            fail_every: None,
            opens: AtomicU64::new(0),
            captures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Simulates a missing camera or a denied permission prompt.
    #[allow(dead_code)]
    pub fn with_fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Every `n`th capture reports a disconnect.
    #[allow(dead_code)]
    pub fn with_fail_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }

    #[allow(dead_code)]
    pub fn opens(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of capture attempts made on any stream opened from this camera.
    #[allow(dead_code)]
    pub fn captures(&self) -> u64 {
        self.captures.load(Ordering::SeqCst)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<Arc<dyn CameraStream + Send + Sync>, DeviceError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            self.logger.warn("No camera attached");
            return Err(DeviceError::Unavailable("fake camera set to fail".to_string()));
        }

        self.logger.info(&format!(
            "Opened {}x{} synthetic stream",
            self.width, self.height
        ));

        Ok(Arc::new(FakeStream {
            logger: self.logger.clone(),
            width: self.width,
            height: self.height,
            fail_every: self.fail_every,
            captures: self.captures.clone(),
        }))
    }
}

struct FakeStream {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
    fail_every: Option<u64>,
    captures: Arc<AtomicU64>,
}

impl CameraStream for FakeStream {
    fn capture_frame(&self) -> Result<Frame, CaptureError> {
        let count = self.captures.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(n) = self.fail_every {
            if count % n == 0 {
                self.logger.warn(&format!("Capture {} dropped", count));
                return Err(CaptureError::Disconnected(format!(
                    "fake capture {} failed",
                    count
                )));
            }
        }

        let mut rng = rand::rng();
        let image = RgbImage::from_fn(self.width, self.height, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        });

        Ok(Frame::new(DynamicImage::ImageRgb8(image)))
    }
}
