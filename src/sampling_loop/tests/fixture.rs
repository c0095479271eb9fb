use crate::config::Config;
use crate::device_camera::{impl_fake::DeviceCameraFake, interface::DeviceCamera};
use crate::device_display::{impl_fake::DeviceDisplayFake, interface::DeviceDisplay};
use crate::frame_classifier::{
    impl_fake::FrameClassifierFake,
    interface::{ClassificationResult, FrameClassifier},
};
use crate::library::logger::{impl_fake::LoggerFake, interface::Logger};
use crate::sampling_loop::core::CycleError;
use crate::sampling_loop::main::{SamplingLoop, StartError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: LoggerFake,
    pub device_camera: Arc<DeviceCameraFake>,
    pub frame_classifier: Arc<FrameClassifierFake>,
    pub device_display: DeviceDisplayFake,
    pub sampling_loop: SamplingLoop,
    pub results: Arc<Mutex<Vec<ClassificationResult>>>,
    pub errors: Arc<Mutex<Vec<CycleError>>>,
}

impl Fixture {
    pub fn new(period_ms: u64) -> Self {
        let logger = LoggerFake::new();
        let logger_arc: Arc<dyn Logger + Send + Sync> = Arc::new(logger.clone());
        Self::build(
            Config::default().with_period(Duration::from_millis(period_ms)),
            DeviceCameraFake::new(logger_arc.clone()),
            FrameClassifierFake::new(logger_arc).with_label(ClassificationResult::Watching),
            logger,
        )
    }

    /// Rebuild with a different config or fakes, keeping the shared logger.
    pub fn with(
        self,
        configure: impl FnOnce(Config) -> Config,
        camera: impl FnOnce(DeviceCameraFake) -> DeviceCameraFake,
        classifier: impl FnOnce(FrameClassifierFake) -> FrameClassifierFake,
    ) -> Self {
        let logger_arc: Arc<dyn Logger + Send + Sync> = Arc::new(self.logger.clone());
        Self::build(
            configure(self.config),
            camera(DeviceCameraFake::new(logger_arc.clone())),
            classifier(
                FrameClassifierFake::new(logger_arc).with_label(ClassificationResult::Watching),
            ),
            self.logger,
        )
    }

    fn build(
        config: Config,
        device_camera: DeviceCameraFake,
        frame_classifier: FrameClassifierFake,
        logger: LoggerFake,
    ) -> Self {
        let logger_arc: Arc<dyn Logger + Send + Sync> = Arc::new(logger.clone());
        let device_camera = Arc::new(device_camera);
        let frame_classifier = Arc::new(frame_classifier);
        let device_display = DeviceDisplayFake::new(logger_arc.clone());

        let sampling_loop = SamplingLoop::new(
            config.clone(),
            logger_arc,
            device_camera.clone() as Arc<dyn DeviceCamera + Send + Sync>,
            frame_classifier.clone() as Arc<dyn FrameClassifier + Send + Sync>,
            Arc::new(Mutex::new(device_display.clone())) as Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        );

        Self {
            config,
            logger,
            device_camera,
            frame_classifier,
            device_display,
            sampling_loop,
            results: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start the loop with callbacks that record into `results` and `errors`.
    pub fn start(&self) -> Result<(), StartError> {
        let results = self.results.clone();
        let errors = self.errors.clone();
        self.sampling_loop.start(
            move |result| results.lock().unwrap().push(result),
            move |error| errors.lock().unwrap().push(error),
        )
    }

    pub fn results(&self) -> Vec<ClassificationResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<CycleError> {
        self.errors.lock().unwrap().clone()
    }
}
