use crate::frame_encoder::EncodedImage;

/// What the remote endpoint decided about the person in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationResult {
    Watching,
    EyesClosed,
    LookingAway,
}

impl ClassificationResult {
    /// Unknown, missing and malformed statuses all mean "not watching".
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("watching") => ClassificationResult::Watching,
            Some("eyes_closed") => ClassificationResult::EyesClosed,
            _ => ClassificationResult::LookingAway,
        }
    }

    pub fn as_status(&self) -> &'static str {
        match self {
            ClassificationResult::Watching => "watching",
            ClassificationResult::EyesClosed => "eyes_closed",
            ClassificationResult::LookingAway => "looking_away",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request could not be sent: {0}")]
    Request(String),
    #[error("endpoint answered HTTP {0}")]
    Status(u16),
    #[error("response body could not be read: {0}")]
    Body(String),
    #[error("response was not JSON: {0}")]
    Decode(String),
}

pub trait FrameClassifier: Send + Sync {
    fn classify(&self, image: &EncodedImage) -> Result<ClassificationResult, TransportError>;
}

/// Parse an `{"status": ...}` response body.
pub fn parse_classification(body: &str) -> Result<ClassificationResult, TransportError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;

    Ok(ClassificationResult::from_status(
        value.get("status").and_then(serde_json::Value::as_str),
    ))
}
