use crate::device_camera::interface::CaptureError;
use crate::frame_classifier::interface::ClassificationResult;
use crate::frame_encoder::encode_jpeg;
use crate::sampling_loop::core::{CycleError, Effect, Msg};
use crate::sampling_loop::main::SamplingLoop;
use std::time::Instant;

impl SamplingLoop {
    pub(super) fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::SubscribeTick => self.run_ticker(),
            Effect::RunCycle { seq } => {
                let outcome = self.run_cycle();
                self.step(Msg::CycleDone { seq, outcome });
            }
            Effect::NotifyResult { seq, result } => {
                self.logger
                    .info(&format!("Cycle {}: {}", seq, result.as_status()));
                if let Some(session) = self.session.get() {
                    (session.on_result)(result);
                }
            }
            Effect::NotifyError { seq, error } => {
                self.logger.warn(&format!("Cycle {} failed: {}", seq, error));
                if let Some(session) = self.session.get() {
                    (session.on_error)(error);
                }
            }
            Effect::DiscardStale {
                seq,
                last_applied_seq,
            } => {
                self.logger.info(&format!(
                    "Cycle {} finished after cycle {}, result dropped",
                    seq, last_applied_seq
                ));
            }
        }
    }

    /// Fires `Msg::Tick` on fixed deadlines so sleep overshoot never accumulates.
    /// Exits on the first tick after the loop stopped.
    fn run_ticker(&self) {
        let period = self.config.sample_period;
        let mut deadline = Instant::now() + period;

        loop {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }

            if !self.step(Msg::Tick(deadline)) {
                return;
            }

            deadline += period;

            // Missed deadlines are dropped rather than fired in a burst.
            let now = Instant::now();
            if deadline < now {
                let missed = ((now - deadline).as_nanos() / period.as_nanos()) as u32 + 1;
                self.logger
                    .warn(&format!("Ticker fell behind, skipping {} tick(s)", missed));
                deadline += period * missed;
            }
        }
    }

    /// Capture, encode, dispatch. Any failure ends just this cycle.
    fn run_cycle(&self) -> Result<ClassificationResult, CycleError> {
        let session = self.session.get().ok_or(CaptureError::StreamEnded)?;

        let frame = session.stream.capture_frame()?;
        let image = encode_jpeg(frame, self.config.jpeg_quality)?;
        let result = self.frame_classifier.classify(&image)?;

        Ok(result)
    }
}
