use crate::device_display::interface::{DeviceDisplay, DisplayStatus};
use std::error::Error;

const WIDTH: usize = 20;

pub struct DeviceDisplayConsole {
    current: Option<DisplayStatus>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { current: None }
    }

    fn render_display(&self) {
        let Some(status) = self.current else {
            return;
        };
        let text: String = status.label().chars().take(WIDTH).collect();
        println!("┌{}┐", "─".repeat(WIDTH));
        println!("│{:^width$}│", text, width = WIDTH);
        println!("└{}┘", "─".repeat(WIDTH));
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, status: DisplayStatus) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.current = Some(status);
        self.render_display();
        Ok(())
    }
}
