use crate::core::backend::{BackendError, GenerationBackend};
use crate::core::chat::CHAT_MAX_TOKENS;
use crate::core::essay::{self, EssayOutcome, EssayRequest};
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui::Context;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Dashboard,
    Essay,
    Chat,
    Timer,
    Todo,
    Theme,
    Calculator,
}

/// Which panel asked, and during which navigation visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub panel: PanelKind,
    pub visit: u64,
}

#[derive(Debug, Clone)]
pub enum Job {
    Essay(EssayRequest),
    Chat { prompt: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Essay(EssayOutcome),
    Chat(Result<String, BackendError>),
}

#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub origin: Origin,
    pub output: JobOutput,
}

pub fn run_job(job: Job, backend: &dyn GenerationBackend) -> JobOutput {
    match job {
        Job::Essay(req) => JobOutput::Essay(essay::generate(&req, backend)),
        Job::Chat { prompt } => JobOutput::Chat(
            backend
                .generate(&prompt, CHAT_MAX_TOKENS)
                .map(|text| text.trim().to_string()),
        ),
    }
}

/// Spawns one thread per job; results come back over a single channel that
/// the UI drains each frame.
pub struct Worker {
    tx: Sender<WorkerResult>,
    rx: Receiver<WorkerResult>,
    backend: Arc<dyn GenerationBackend>,
}

impl Worker {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx, backend }
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_configured()
    }

    pub fn dispatch(&self, origin: Origin, job: Job, repaint: Option<Context>) {
        let tx = self.tx.clone();
        let backend = Arc::clone(&self.backend);
        let spawned = std::thread::Builder::new()
            .name(format!("{:?}-job", origin.panel).to_lowercase())
            .spawn(move || {
                let output = run_job(job, backend.as_ref());
                if tx.send(WorkerResult { origin, output }).is_err() {
                    log::debug!("result channel closed before job finished");
                }
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            });
        if let Err(err) = spawned {
            log::error!("could not spawn worker thread: {err}");
        }
    }

    pub fn drain(&self) -> Vec<WorkerResult> {
        self.rx.try_iter().collect()
    }
}
