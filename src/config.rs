use chrono::Offset;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze_frame";

#[derive(Debug, Clone)]
pub struct Config {
    /// Time between ticks. One capture-and-dispatch cycle starts per tick.
    pub sample_period: Duration,
    pub endpoint: String,
    /// Skip ticks while a cycle is still in flight.
    pub serialize: bool,
    pub request_timeout: Duration,
    /// Consecutive failed cycles before the display falls back to "Unavailable".
    pub unavailable_after_failures: u32,
    pub jpeg_quality: u8,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        let sample_period = Duration::from_millis(500);
        Self {
            sample_period,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            serialize: false,
            request_timeout: sample_period * 5,
            unavailable_after_failures: 5,
            jpeg_quality: 80,
            logger_timezone: chrono::Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sample period must be greater than zero")]
    ZeroPeriod,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("jpeg quality must be within 1..=100, got {0}")]
    JpegQuality(u8),
    #[error("unavailable threshold must be at least 1")]
    ZeroFailureThreshold,
    #[error("endpoint {0:?} is not an http(s) url")]
    Endpoint(String),
}

impl Config {
    /// Changes the period and keeps the request timeout at five periods.
    pub fn with_period(mut self, sample_period: Duration) -> Self {
        self.sample_period = sample_period;
        self.request_timeout = sample_period * 5;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        if self.unavailable_after_failures == 0 {
            return Err(ConfigError::ZeroFailureThreshold);
        }
        match url::Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
            _ => Err(ConfigError::Endpoint(self.endpoint.clone())),
        }
    }
}
