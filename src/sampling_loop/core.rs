use crate::config::Config;
use crate::device_camera::interface::CaptureError;
use crate::device_display::interface::DisplayStatus;
use crate::frame_classifier::interface::{ClassificationResult, TransportError};
use std::time::Instant;

/// Why a single cycle produced no classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    pub phase: Phase,
    /// Sequence number handed to the most recently started cycle.
    pub last_started_seq: u64,
    /// Sequence number of the cycle whose result is currently displayed.
    pub last_applied_seq: u64,
    /// Cycles started whose outcome has not yet been handed to the callbacks.
    pub in_flight: usize,
    pub consecutive_failures: u32,
    pub display: DisplayStatus,
    pub current: Option<ClassificationResult>,
    pub stats: LoopStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub cycles_started: u64,
    pub cycles_succeeded: u64,
    pub cycles_failed: u64,
    /// Ticks that started nothing because a serialized cycle was still running.
    pub ticks_skipped: u64,
    /// Results that arrived after a newer one had already been applied.
    pub stale_discarded: u64,
}

impl Model {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Started,
    Tick(Instant),
    CycleDone {
        seq: u64,
        outcome: Result<ClassificationResult, CycleError>,
    },
    /// The callbacks for cycle `seq` have returned.
    Delivered {
        seq: u64,
    },
    StopRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeTick,
    RunCycle { seq: u64 },
    NotifyResult { seq: u64, result: ClassificationResult },
    NotifyError { seq: u64, error: CycleError },
    DiscardStale { seq: u64, last_applied_seq: u64 },
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match (model.phase, msg) {
        (Phase::Idle, Msg::Started) => (
            Model {
                phase: Phase::Running,
                ..model
            },
            vec![Effect::SubscribeTick],
        ),

        (Phase::Running, Msg::Tick(_)) => {
            if config.serialize && model.in_flight > 0 {
                let mut model = model;
                model.stats.ticks_skipped += 1;
                return (model, vec![]);
            }

            let mut model = model;
            let seq = model.last_started_seq + 1;
            model.last_started_seq = seq;
            model.in_flight += 1;
            model.stats.cycles_started += 1;
            (model, vec![Effect::RunCycle { seq }])
        }

        // Cycles dispatched before a stop still land here and are applied.
        (_, Msg::CycleDone { seq, outcome }) => {
            let mut model = model;

            match outcome {
                Ok(result) => {
                    model.stats.cycles_succeeded += 1;
                    model.consecutive_failures = 0;

                    if seq <= model.last_applied_seq {
                        model.stats.stale_discarded += 1;
                        let last_applied_seq = model.last_applied_seq;
                        return (
                            model,
                            vec![Effect::DiscardStale {
                                seq,
                                last_applied_seq,
                            }],
                        );
                    }

                    model.last_applied_seq = seq;
                    model.current = Some(result);
                    model.display = DisplayStatus::from(result);
                    (model, vec![Effect::NotifyResult { seq, result }])
                }
                Err(error) => {
                    model.stats.cycles_failed += 1;
                    model.consecutive_failures = model.consecutive_failures.saturating_add(1);

                    if model.consecutive_failures >= config.unavailable_after_failures {
                        model.current = None;
                        model.display = DisplayStatus::Unavailable;
                    }
                    (model, vec![Effect::NotifyError { seq, error }])
                }
            }
        }

        (_, Msg::Delivered { .. }) => (
            Model {
                in_flight: model.in_flight.saturating_sub(1),
                ..model
            },
            vec![],
        ),

        (Phase::Idle | Phase::Running, Msg::StopRequested) => (
            Model {
                phase: Phase::Stopped,
                ..model
            },
            vec![],
        ),

        (_, _) => (model, vec![]),
    }
}
