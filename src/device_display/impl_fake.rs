use crate::device_display::interface::{DeviceDisplay, DisplayStatus};
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

#[allow(dead_code)]
#[derive(Clone)]
pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    shown: Arc<Mutex<Vec<DisplayStatus>>>,
}

impl DeviceDisplayFake {
    #[allow(dead_code)]
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("fake"),
            shown: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every status shown so far, oldest first.
    #[allow(dead_code)]
    pub fn shown(&self) -> Vec<DisplayStatus> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<DisplayStatus> {
        self.shown().last().copied()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, status: DisplayStatus) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("DeviceDisplayFake::show({:?})", status));
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status);
        Ok(())
    }
}
