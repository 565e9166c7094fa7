//! Transfer executor: drives one URL from resume planning to a terminal state.
//!
//! plan (resume) → GET with optional range (fetch) → interpret status →
//! stream chunks into the target file (storage) → Completed | Failed.

mod events;
mod executor;
mod handler;
mod response;

pub use events::{EventKind, EventSender, TransferEvent};
pub use executor::{execute, run_transfer, TransferContext};
pub use handler::TransferHandler;
pub use response::{interpret_response, ResolvedTransfer, ResponseKind};

pub(crate) use executor::reject;

use std::path::PathBuf;

use crate::error::TransferError;

/// Lifecycle state of a transfer task.
///
/// `Pending → {Resuming | Restarting} → InProgress → {Completed | Failed}`;
/// any non-terminal state may also go straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// Created, not yet planned.
    Pending,
    /// Local partial file found; remaining bytes requested.
    Resuming,
    /// No usable local bytes; downloading from byte 0.
    Restarting,
    /// Response accepted, body streaming to disk.
    InProgress,
    Completed,
    Failed,
}

impl TransferStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Failed)
    }

    pub fn can_transition_to(self, next: TransferStatus) -> bool {
        use TransferStatus::*;
        match (self, next) {
            (Completed | Failed, _) => false,
            (_, Failed) => true,
            (Pending, Resuming | Restarting) => true,
            (Resuming | Restarting, InProgress) => true,
            (InProgress, Completed) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Resuming => "resuming",
            TransferStatus::Restarting => "restarting",
            TransferStatus::InProgress => "in_progress",
            TransferStatus::Completed => "completed",
            TransferStatus::Failed => "failed",
        }
    }
}

/// One URL-to-file download.
#[derive(Debug, Clone)]
pub struct TransferTask {
    /// Position of the URL in the batch input.
    pub id: usize,
    pub url: String,
    pub target: PathBuf,
    /// Size of the local file found at planning time.
    pub resume_offset: u64,
    /// Full resource size, once a response declared it.
    pub total_size: Option<u64>,
    /// Bytes of the resource present in the target file.
    pub bytes_written: u64,
    pub status: TransferStatus,
}

impl TransferTask {
    pub fn new(id: usize, url: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            id,
            url: url.into(),
            target: target.into(),
            resume_offset: 0,
            total_size: None,
            bytes_written: 0,
            status: TransferStatus::Pending,
        }
    }

    /// Moves to `next` if the state machine allows it.
    pub(crate) fn advance(&mut self, next: TransferStatus) {
        if self.status.can_transition_to(next) {
            self.status = next;
        } else {
            tracing::warn!(
                url = %self.url,
                from = self.status.as_str(),
                to = next.as_str(),
                "ignored invalid status transition"
            );
        }
    }
}

/// Final state of one task: its last snapshot plus success or the cause.
#[derive(Debug)]
pub struct TransferReport {
    pub task: TransferTask,
    pub result: Result<(), TransferError>,
}

impl TransferReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&TransferError> {
        self.result.as_ref().err()
    }
}
