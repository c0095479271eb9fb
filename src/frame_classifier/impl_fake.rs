use crate::frame_classifier::interface::{ClassificationResult, FrameClassifier, TransportError};
use crate::frame_encoder::EncodedImage;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LABELS: [ClassificationResult; 3] = [
    ClassificationResult::Watching,
    ClassificationResult::EyesClosed,
    ClassificationResult::LookingAway,
];

#[derive(Default)]
struct Counters {
    calls: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

pub struct FrameClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    label: Option<ClassificationResult>,
    latency: Duration,
    fail_every: Option<u64>,
    counters: Arc<Counters>,
}

impl FrameClassifierFake {
    /// Answers with a random label on every call.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("fake"),
            label: None,
            latency: Duration::ZERO,
            fail_every: None,
            counters: Arc::new(Counters::default()),
        }
    }

    #[allow(dead_code)]
    pub fn with_label(mut self, label: ClassificationResult) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every `n`th call fails with a transport error.
    #[allow(dead_code)]
    pub fn with_fail_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> u64 {
        self.counters.calls.load(Ordering::SeqCst)
    }

    /// Most calls that were ever running at the same time.
    #[allow(dead_code)]
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }

    fn pick_label(&self) -> Result<ClassificationResult, TransportError> {
        if let Some(label) = self.label {
            return Ok(label);
        }
        let index = Uniform::new(0, LABELS.len())
            .map_err(|e| TransportError::Request(e.to_string()))?
            .sample(&mut rand::rng());
        Ok(LABELS[index])
    }
}

impl FrameClassifier for FrameClassifierFake {
    fn classify(&self, image: &EncodedImage) -> Result<ClassificationResult, TransportError> {
        let call = self.counters.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let in_flight = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .peak_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let result = match self.fail_every {
            Some(n) if call % n == 0 => Err(TransportError::Request(format!(
                "fake call {} failed",
                call
            ))),
            _ => self.pick_label(),
        };

        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Ok(label) = &result {
            self.logger.info(&format!(
                "Call {} ({} bytes) -> {}",
                call,
                image.bytes.len(),
                label.as_status()
            ));
        }

        result
    }
}
