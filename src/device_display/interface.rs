use crate::frame_classifier::interface::ClassificationResult;
use std::error::Error;

/// What the user sees. One value is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStatus {
    #[default]
    Starting,
    Watching,
    EyesClosed,
    LookingAway,
    /// Too many cycles in a row failed to produce a classification.
    Unavailable,
}

impl DisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Starting => "Starting...",
            DisplayStatus::Watching => "Watching Screen",
            DisplayStatus::EyesClosed => "Eyes Closed",
            DisplayStatus::LookingAway => "Looking Away",
            DisplayStatus::Unavailable => "Unavailable",
        }
    }
}

impl From<ClassificationResult> for DisplayStatus {
    fn from(result: ClassificationResult) -> Self {
        match result {
            ClassificationResult::Watching => DisplayStatus::Watching,
            ClassificationResult::EyesClosed => DisplayStatus::EyesClosed,
            ClassificationResult::LookingAway => DisplayStatus::LookingAway,
        }
    }
}

pub trait DeviceDisplay: Send + Sync {
    /// Replace whatever is on screen with `status`.
    fn show(&mut self, status: DisplayStatus) -> Result<(), Box<dyn Error + Send + Sync>>;
}
