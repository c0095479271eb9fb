use crate::device_display::interface::{DeviceDisplay, DisplayStatus};
use egui::{Color32, RichText};
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

struct StatusWindow {
    status: Arc<Mutex<DisplayStatus>>,
}

fn colors(status: DisplayStatus) -> (Color32, Color32) {
    match status {
        DisplayStatus::Watching => (Color32::from_rgb(200, 255, 200), Color32::from_rgb(20, 90, 20)),
        DisplayStatus::EyesClosed => (Color32::from_rgb(255, 240, 190), Color32::from_rgb(120, 80, 0)),
        DisplayStatus::LookingAway => (Color32::from_rgb(255, 205, 205), Color32::from_rgb(140, 20, 20)),
        DisplayStatus::Starting | DisplayStatus::Unavailable => {
            (Color32::from_rgb(220, 220, 220), Color32::from_rgb(70, 70, 70))
        }
    }
}

impl eframe::App for StatusWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let status = *self.status.lock().unwrap_or_else(PoisonError::into_inner);
        let (background, foreground) = colors(status);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(background))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.label(
                        RichText::new(status.label())
                            .size(28.0)
                            .strong()
                            .color(foreground),
                    );
                });
            });

        // Status changes arrive from other threads, so poll.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Desktop window showing the current status. The window itself must be run on
/// the main thread with [`DeviceDisplayGui::run_window`].
#[derive(Clone)]
pub struct DeviceDisplayGui {
    status: Arc<Mutex<DisplayStatus>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            status: Arc::new(Mutex::new(DisplayStatus::default())),
        }
    }

    /// Blocks until the user closes the window.
    pub fn run_window(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([360.0, 160.0])
                .with_resizable(false),
            ..Default::default()
        };

        let window = StatusWindow {
            status: self.status.clone(),
        };

        eframe::run_native("Focus Monitor", options, Box::new(|_cc| Box::new(window)))
            .map_err(|e| e.to_string().into())
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, status: DisplayStatus) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
        Ok(())
    }
}
