use crate::frame_classifier::interface::{
    parse_classification, ClassificationResult, FrameClassifier, TransportError,
};
use crate::frame_encoder::EncodedImage;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use std::time::Duration;

/// Posts each frame to an `/analyze_frame` style endpoint.
pub struct FrameClassifierHttp {
    logger: Arc<dyn Logger + Send + Sync>,
    endpoint: String,
    agent: ureq::Agent,
}

impl FrameClassifierHttp {
    /// `timeout` bounds the whole round-trip, connect included.
    pub fn new(endpoint: &str, timeout: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("http"),
            endpoint: endpoint.to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl FrameClassifier for FrameClassifierHttp {
    fn classify(&self, image: &EncodedImage) -> Result<ClassificationResult, TransportError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", image.content_type)
            .send_bytes(&image.bytes)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => TransportError::Status(code),
                ureq::Error::Transport(t) => TransportError::Request(t.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        parse_classification(&body).inspect_err(|e| {
            self.logger
                .warn(&format!("{} (body: {:?})", e, truncate(body.trim(), 120)));
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
