//! Observable transfer lifecycle events.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ErrorClass;

/// Channel the executor publishes events on. Unbounded so a slow consumer
/// never stalls a transfer thread.
pub type EventSender = tokio::sync::mpsc::UnboundedSender<TransferEvent>;

/// One event of one task.
#[derive(Debug, Clone)]
pub struct TransferEvent {
    /// Task id (position of the URL in the batch input).
    pub task: usize,
    pub url: Arc<str>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Planned a download from byte 0.
    Started { path: PathBuf },
    /// Planned a resume from `offset`; the range request is about to go out.
    Resuming { path: PathBuf, offset: u64 },
    /// Server answered 206; bytes are appended after `offset`.
    ResumeConfirmed { offset: u64, total: Option<u64> },
    /// Server answered 200 to a range request; `discarded` local bytes are dropped.
    RestartFallback { discarded: u64, total: Option<u64> },
    /// A chunk was written.
    Progress { bytes_written: u64, total: Option<u64> },
    Completed { path: PathBuf, bytes_written: u64 },
    Failed { class: ErrorClass, reason: String },
}

impl EventKind {
    /// Completed fraction in [0.0, 1.0] for progress events with a known total.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            EventKind::Progress {
                bytes_written,
                total: Some(total),
            } => {
                if *total == 0 {
                    return Some(1.0);
                }
                Some((*bytes_written as f64 / *total as f64).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Completed { .. } | EventKind::Failed { .. })
    }
}

/// Per-task publishing handle; a no-op when nobody listens.
#[derive(Debug, Clone)]
pub(crate) struct Emitter {
    task: usize,
    url: Arc<str>,
    tx: Option<EventSender>,
}

impl Emitter {
    pub(crate) fn new(task: usize, url: Arc<str>, tx: Option<EventSender>) -> Self {
        Self { task, url, tx }
    }

    pub(crate) fn emit(&self, kind: EventKind) {
        if let Some(tx) = &self.tx {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(TransferEvent {
                task: self.task,
                url: Arc::clone(&self.url),
                kind,
            });
        }
    }
}
