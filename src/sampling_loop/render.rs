use crate::sampling_loop::core::Model;
use crate::sampling_loop::main::SamplingLoop;
use std::sync::PoisonError;

impl SamplingLoop {
    /// Push the model's status to the sink. Called with the model lock held, so
    /// the sink sees statuses in the order they were applied.
    pub(super) fn render(&self, model: &Model) {
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = device_display.show(model.display) {
            self.logger.error(&format!(
                "Display rejected {:?}: {}",
                model.display, e
            ));
        }
    }
}
