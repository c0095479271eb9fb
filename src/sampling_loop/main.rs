use crate::config::{Config, ConfigError};
use crate::device_camera::interface::{CameraStream, DeviceCamera, DeviceError};
use crate::device_display::interface::{DeviceDisplay, DisplayStatus};
use crate::frame_classifier::interface::{ClassificationResult, FrameClassifier};
use crate::library::logger::interface::Logger;
use crate::sampling_loop::core::{init, transition, CycleError, Effect, LoopStats, Model, Msg, Phase};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

pub type ResultCallback = Arc<dyn Fn(ClassificationResult) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(CycleError) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Everything that only exists once the camera has been opened.
pub(super) struct Session {
    pub stream: Arc<dyn CameraStream + Send + Sync>,
    pub on_result: ResultCallback,
    pub on_error: ErrorCallback,
}

/// Pulls a frame every `sample_period`, classifies it remotely and shows the
/// newest answer.
///
/// All model changes go through [`SamplingLoop::step`] under one lock, and a
/// cycle thread is only ever spawned while that lock is held. Once `stop`
/// returns no further cycle can start; cycles already dispatched run to
/// completion and are still applied.
///
/// Outcomes reach the callbacks in the order they were applied: a finished
/// cycle holds `delivery` from before it touches the model until its callbacks
/// return.
#[derive(Clone)]
pub struct SamplingLoop {
    pub(super) config: Config,
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub(super) frame_classifier: Arc<dyn FrameClassifier + Send + Sync>,
    pub(super) device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    pub(super) model: Arc<Mutex<Model>>,
    pub(super) session: Arc<OnceLock<Session>>,
    pub(super) delivery: Arc<Mutex<()>>,
}

impl SamplingLoop {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        frame_classifier: Arc<dyn FrameClassifier + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    ) -> Self {
        let (model, _) = init();

        Self {
            config,
            logger: logger.with_namespace("sampling_loop"),
            device_camera,
            frame_classifier,
            device_display,
            model: Arc::new(Mutex::new(model)),
            session: Arc::new(OnceLock::new()),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Checks the config, opens the camera and begins ticking. Either failure
    /// is reported here, once, and nothing gets scheduled.
    pub fn start<R, E>(&self, on_result: R, on_error: E) -> Result<(), StartError>
    where
        R: Fn(ClassificationResult) + Send + Sync + 'static,
        E: Fn(CycleError) + Send + Sync + 'static,
    {
        self.config.validate().inspect_err(|e| {
            self.logger.error(&format!("Refusing to start: {}", e));
        })?;

        let mut model = self.lock_model();
        if model.phase != Phase::Idle {
            self.logger
                .warn(&format!("start() ignored, loop is {:?}", model.phase));
            return Ok(());
        }

        let stream = self.device_camera.open().inspect_err(|e| {
            self.logger.error(&format!("Camera failed to open: {}", e));
        })?;

        // Phase leaves Idle below under the same lock, so this runs once.
        let _ = self.session.set(Session {
            stream,
            on_result: Arc::new(on_result),
            on_error: Arc::new(on_error),
        });

        self.logger.info(&format!(
            "Sampling every {:?} (serialize: {})",
            self.config.sample_period, self.config.serialize
        ));
        let (_, deferred) = self.apply(&mut model, Msg::Started);
        drop(model);

        for effect in deferred {
            self.run_effect(effect);
        }

        Ok(())
    }

    /// No cycle starts after this returns. In-flight cycles are left alone.
    pub fn stop(&self) {
        self.step(Msg::StopRequested);
        self.logger.info("Stopped");
    }

    pub fn is_running(&self) -> bool {
        self.lock_model().is_running()
    }

    #[allow(dead_code)]
    pub fn current(&self) -> DisplayStatus {
        self.lock_model().display
    }

    pub fn stats(&self) -> LoopStats {
        self.lock_model().stats
    }

    #[allow(dead_code)]
    pub fn in_flight(&self) -> usize {
        self.lock_model().in_flight
    }

    pub(super) fn lock_model(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one message. Returns whether the loop is still running afterwards.
    pub(super) fn step(&self, msg: Msg) -> bool {
        let done_seq = match &msg {
            Msg::CycleDone { seq, .. } => Some(*seq),
            _ => None,
        };
        // Taken before the model lock, never after it.
        let _delivery = done_seq.map(|_| {
            self.delivery
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        });

        let (running, deferred) = self.apply(&mut self.lock_model(), msg);

        // Callbacks run without the model lock so they may call back into the loop.
        for effect in deferred {
            self.run_effect(effect);
        }

        match done_seq {
            Some(seq) => self.apply(&mut self.lock_model(), Msg::Delivered { seq }).0,
            None => running,
        }
    }

    /// Transition the locked model, render a changed status and spawn the
    /// threaded effects. The rest is handed back to run once the lock is gone.
    fn apply(&self, model: &mut Model, msg: Msg) -> (bool, Vec<Effect>) {
        let announce = matches!(msg, Msg::Started);
        let previous_display = model.display;

        let (next, effects) = transition(&self.config, model.clone(), msg);
        *model = next;

        if announce || model.display != previous_display {
            self.render(model);
        }

        let mut deferred = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubscribeTick | Effect::RunCycle { .. } => self.spawn_effect(effect),
                effect => deferred.push(effect),
            }
        }

        (model.is_running(), deferred)
    }

    fn spawn_effect(&self, effect: Effect) {
        let self_clone = self.clone();
        std::thread::spawn(move || self_clone.run_effect(effect));
    }
}
