use crate::device_camera::interface::{CameraStream, CaptureError, DeviceCamera, DeviceError, Frame};
use crate::library::logger::interface::Logger;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

const MAX_SNAPSHOT_BYTES: u64 = 5 * 1024 * 1024;

/// Network camera that serves its latest frame as a still JPEG on every `GET`.
pub struct DeviceCameraSnapshot {
    logger: Arc<dyn Logger + Send + Sync>,
    url: String,
    agent: ureq::Agent,
}

impl DeviceCameraSnapshot {
    pub fn new(url: &str, timeout: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("snapshot"),
            url: url.to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

enum FetchError {
    Status(u16),
    Transport(String),
    Decode(String),
}

fn fetch_frame(agent: &ureq::Agent, url: &str) -> Result<Frame, FetchError> {
    let response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => FetchError::Status(code),
        ureq::Error::Transport(t) => FetchError::Transport(t.to_string()),
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_SNAPSHOT_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let image = image::load_from_memory(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(Frame::new(image))
}

impl DeviceCamera for DeviceCameraSnapshot {
    fn open(&self) -> Result<Arc<dyn CameraStream + Send + Sync>, DeviceError> {
        self.logger.info(&format!("Probing {}", self.url));

        // The probe frame is thrown away; it only proves the device answers.
        let probe = fetch_frame(&self.agent, &self.url).map_err(|e| match e {
            FetchError::Status(code @ (401 | 403)) => {
                DeviceError::PermissionDenied(format!("{} answered {}", self.url, code))
            }
            FetchError::Status(code) => {
                DeviceError::Unavailable(format!("{} answered {}", self.url, code))
            }
            FetchError::Transport(reason) | FetchError::Decode(reason) => {
                DeviceError::Unavailable(reason)
            }
        })?;

        self.logger.info(&format!(
            "Camera ready ({}x{})",
            probe.width(),
            probe.height()
        ));

        Ok(Arc::new(SnapshotStream {
            url: self.url.clone(),
            agent: self.agent.clone(),
        }))
    }
}

struct SnapshotStream {
    url: String,
    agent: ureq::Agent,
}

impl CameraStream for SnapshotStream {
    fn capture_frame(&self) -> Result<Frame, CaptureError> {
        fetch_frame(&self.agent, &self.url).map_err(|e| match e {
            FetchError::Status(404 | 410) => CaptureError::StreamEnded,
            FetchError::Status(code) => {
                CaptureError::Disconnected(format!("snapshot answered {}", code))
            }
            FetchError::Transport(reason) => CaptureError::Disconnected(reason),
            FetchError::Decode(reason) => CaptureError::Disconnected(format!(
                "snapshot was not a readable image: {}",
                reason
            )),
        })
    }
}
