use clap::{Parser, ValueEnum};
use config::{Config, DEFAULT_ENDPOINT};
use device_camera::{
    impl_fake::DeviceCameraFake, impl_snapshot::DeviceCameraSnapshot, interface::DeviceCamera,
};
use device_display::{
    impl_console::DeviceDisplayConsole, impl_gui::DeviceDisplayGui, interface::DeviceDisplay,
};
use frame_classifier::{
    impl_fake::FrameClassifierFake,
    impl_http::FrameClassifierHttp,
    interface::{ClassificationResult, FrameClassifier},
};
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use sampling_loop::main::SamplingLoop;
use std::collections::BTreeMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::time::Duration;

mod config;
mod device_camera;
mod device_display;
mod frame_classifier;
mod frame_encoder;
mod library;
mod sampling_loop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CameraKind {
    /// Synthetic noise frames.
    Fake,
    /// Network camera serving a still JPEG per request.
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassifierKind {
    Http,
    /// Random labels, no network.
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DisplayKind {
    Console,
    Gui,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Samples camera frames on a fixed period and shows whether the user is watching the screen"
)]
struct Args {
    /// Classification endpoint receiving one JPEG per POST.
    #[arg(long, env = "FOCUS_MONITOR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Time between frame captures.
    #[arg(long, env = "FOCUS_MONITOR_PERIOD_MS", default_value_t = 500)]
    period_ms: u64,

    /// Skip ticks while the previous frame is still being classified.
    #[arg(long, env = "FOCUS_MONITOR_SERIALIZE")]
    serialize: bool,

    /// Per-request timeout. Defaults to five periods.
    #[arg(long, env = "FOCUS_MONITOR_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Consecutive failed cycles before the status shows "Unavailable".
    #[arg(long, env = "FOCUS_MONITOR_UNAVAILABLE_AFTER", default_value_t = 5)]
    unavailable_after: u32,

    #[arg(long, env = "FOCUS_MONITOR_JPEG_QUALITY", default_value_t = 80)]
    jpeg_quality: u8,

    #[arg(long, value_enum, default_value_t = CameraKind::Fake)]
    camera: CameraKind,

    #[arg(
        long,
        env = "FOCUS_MONITOR_SNAPSHOT_URL",
        required_if_eq("camera", "snapshot")
    )]
    snapshot_url: Option<String>,

    #[arg(long, value_enum, default_value_t = ClassifierKind::Http)]
    classifier: ClassifierKind,

    /// Artificial round-trip time for `--classifier fake`.
    #[arg(long, default_value_t = 0)]
    fake_latency_ms: u64,

    #[arg(long, value_enum, default_value_t = DisplayKind::Console)]
    display: DisplayKind,

    /// Stop after this many seconds instead of waiting for Ctrl-C (console only).
    #[arg(long)]
    run_for_secs: Option<u64>,

    /// Offset applied to log timestamps.
    #[arg(
        long,
        env = "FOCUS_MONITOR_UTC_OFFSET_MINUTES",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    utc_offset_minutes: i32,
}

impl Args {
    fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = Config::default().with_period(Duration::from_millis(self.period_ms));
        config.endpoint = self.endpoint.clone();
        config.serialize = self.serialize;
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout = Duration::from_millis(timeout_ms);
        }
        config.unavailable_after_failures = self.unavailable_after;
        config.jpeg_quality = self.jpeg_quality;
        config.logger_timezone = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(chrono::FixedOffset::east_opt)
            .ok_or_else(|| {
                format!(
                    "utc offset of {} minutes is out of range",
                    self.utc_offset_minutes
                )
            })?;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.config()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match args.camera {
        CameraKind::Fake => Arc::new(DeviceCameraFake::new(logger.clone()).with_resolution(640, 480)),
        CameraKind::Snapshot => Arc::new(DeviceCameraSnapshot::new(
            args.snapshot_url.as_deref().unwrap_or_default(),
            config.request_timeout,
            logger.clone(),
        )),
    };

    let frame_classifier: Arc<dyn FrameClassifier + Send + Sync> = match args.classifier {
        ClassifierKind::Http => Arc::new(FrameClassifierHttp::new(
            &config.endpoint,
            config.request_timeout,
            logger.clone(),
        )),
        ClassifierKind::Fake => Arc::new(
            FrameClassifierFake::new(logger.clone())
                .with_latency(Duration::from_millis(args.fake_latency_ms)),
        ),
    };

    let gui = DeviceDisplayGui::new();
    let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> = match args.display {
        DisplayKind::Console => Arc::new(Mutex::new(DeviceDisplayConsole::new())),
        DisplayKind::Gui => Arc::new(Mutex::new(gui.clone())),
    };

    let sampling_loop = SamplingLoop::new(
        config,
        logger.clone(),
        device_camera,
        frame_classifier,
        device_display,
    );

    let tally: Arc<Mutex<BTreeMap<&'static str, u64>>> = Arc::new(Mutex::new(BTreeMap::new()));
    let tally_results = tally.clone();
    let tally_errors = tally.clone();

    sampling_loop.start(
        move |result: ClassificationResult| {
            *tally_results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(result.as_status())
                .or_default() += 1;
        },
        move |_| {
            *tally_errors
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry("failed")
                .or_default() += 1;
        },
    )?;

    match args.display {
        DisplayKind::Gui => {
            gui.run_window()
                .map_err(|e| e as Box<dyn std::error::Error>)?;
        }
        DisplayKind::Console => {
            let (stop_tx, stop_rx) = mpsc::channel();
            let ctrlc_tx = stop_tx.clone();
            ctrlc::set_handler(move || {
                let _ = ctrlc_tx.send(());
            })?;
            if let Some(secs) = args.run_for_secs {
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_secs(secs));
                    let _ = stop_tx.send(());
                });
            }
            let _ = stop_rx.recv();
        }
    }

    sampling_loop.stop();

    let stats = sampling_loop.stats();
    logger.info(&format!(
        "{} cycles started, {} succeeded, {} failed, {} ticks skipped, {} stale results dropped",
        stats.cycles_started,
        stats.cycles_succeeded,
        stats.cycles_failed,
        stats.ticks_skipped,
        stats.stale_discarded
    ));
    let tally = tally.lock().unwrap_or_else(PoisonError::into_inner);
    let total: u64 = tally.values().sum();
    if total > 0 {
        for (status, count) in tally.iter() {
            logger.info(&format!(
                "{:>12}: {:>5} ({:.0}%)",
                status,
                count,
                *count as f64 * 100.0 / total as f64
            ));
        }
    }

    Ok(())
}
