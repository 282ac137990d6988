use std::collections::VecDeque;
use std::path::PathBuf;

use crate::{Effect, FetcherConfig, OutboundPort, ReadTarget};

pub type RequestId = u64;

/// Requests waiting behind the one in flight before new ones are refused.
pub const MAX_QUEUED: usize = 8;

/// Where the single in-flight fetch currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// `get-file` sent; waiting for the dialog result.
    Requesting { request_id: RequestId },
    /// Path known; read in progress.
    Reading { request_id: RequestId, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherView {
    pub phase: FetchPhase,
    pub queued: usize,
    pub delivered: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: FetcherConfig,
    phase: FetchPhase,
    queued: VecDeque<Option<PathBuf>>,
    last_request_id: RequestId,
    delivered: u64,
}

impl AppState {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn view(&self) -> FetcherView {
        FetcherView {
            phase: self.phase.clone(),
            queued: self.queued.len(),
            delivered: self.delivered,
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.phase == FetchPhase::Idle
    }

    pub(crate) fn awaiting_dialog(&self, request_id: RequestId) -> bool {
        matches!(
            self.phase,
            FetchPhase::Requesting { request_id: current } if current == request_id
        )
    }

    pub(crate) fn awaiting_read(&self, request_id: RequestId) -> bool {
        matches!(
            self.phase,
            FetchPhase::Reading { request_id: current, .. } if current == request_id
        )
    }

    pub(crate) fn queue_full(&self) -> bool {
        self.queued.len() >= MAX_QUEUED
    }

    pub(crate) fn enqueue(&mut self, path: Option<PathBuf>) {
        self.queued.push_back(path);
    }

    /// Moves from IDLE into REQUESTING (dialog) or READING (direct path).
    pub(crate) fn begin_fetch(&mut self, path: Option<PathBuf>) -> Effect {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        match path {
            Some(path) => {
                self.phase = FetchPhase::Reading {
                    request_id,
                    path: path.clone(),
                };
                Effect::ReadFile {
                    request_id,
                    target: ReadTarget::InstallRelative(path),
                }
            }
            None => {
                self.phase = FetchPhase::Requesting { request_id };
                Effect::RequestDialog { request_id }
            }
        }
    }

    pub(crate) fn start_reading(&mut self, request_id: RequestId, path: PathBuf) -> Effect {
        self.phase = FetchPhase::Reading {
            request_id,
            path: path.clone(),
        };
        Effect::ReadFile {
            request_id,
            target: ReadTarget::Absolute(path),
        }
    }

    /// DELIVERED: hands `port` to the UI, returns to IDLE and starts the next
    /// queued request if any.
    pub(crate) fn deliver(&mut self, port: OutboundPort) -> Vec<Effect> {
        self.phase = FetchPhase::Idle;
        self.delivered += 1;
        let mut effects = vec![Effect::Deliver(port)];
        if let Some(next) = self.queued.pop_front() {
            effects.push(self.begin_fetch(next));
        }
        effects
    }
}
