//! Drives one task from planning to a terminal state.

use std::sync::Arc;

use crate::control::AbortToken;
use crate::error::TransferError;
use crate::fetch::HttpClient;
use crate::resume::plan_resume;
use crate::scheduler::ConcurrencyGate;

use super::events::{Emitter, EventKind, EventSender};
use super::handler::TransferHandler;
use super::{TransferReport, TransferStatus, TransferTask};

/// Everything a transfer needs besides its task. Cheap to clone.
#[derive(Clone)]
pub struct TransferContext {
    pub client: Arc<HttpClient>,
    pub events: Option<EventSender>,
    pub abort: AbortToken,
}

impl TransferContext {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            events: None,
            abort: AbortToken::new(),
        }
    }

    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn with_abort(mut self, abort: AbortToken) -> Self {
        self.abort = abort;
        self
    }

    fn emitter(&self, task: &TransferTask) -> Emitter {
        Emitter::new(task.id, Arc::from(task.url.as_str()), self.events.clone())
    }
}

/// Waits for a gate slot, then runs the transfer on a blocking thread.
/// The slot is held until the task is terminal.
pub async fn run_transfer(
    ctx: TransferContext,
    task: TransferTask,
    gate: &ConcurrencyGate,
) -> TransferReport {
    let _permit = match gate.admit().await {
        Ok(permit) => permit,
        Err(_) => return reject(&ctx, task, TransferError::Cancelled),
    };
    let (id, url, target) = (task.id, task.url.clone(), task.target.clone());
    match tokio::task::spawn_blocking(move || execute(&ctx, task)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "transfer thread failed");
            let mut task = TransferTask::new(id, url, target);
            task.advance(TransferStatus::Failed);
            TransferReport {
                task,
                result: Err(TransferError::Internal(e.to_string())),
            }
        }
    }
}

/// Fails `task` without starting it.
pub(crate) fn reject(
    ctx: &TransferContext,
    mut task: TransferTask,
    err: TransferError,
) -> TransferReport {
    task.advance(TransferStatus::Failed);
    tracing::warn!(url = %task.url, error = %err, "transfer not started");
    ctx.emitter(&task).emit(EventKind::Failed {
        class: err.class(),
        reason: err.to_string(),
    });
    TransferReport {
        task,
        result: Err(err),
    }
}

/// Runs one transfer to completion on the current thread.
///
/// Plans from the local file size, issues the GET (ranged when resuming),
/// streams the body into the target file, and returns the terminal snapshot.
/// Never panics on transfer errors; they end up in the report.
pub fn execute(ctx: &TransferContext, mut task: TransferTask) -> TransferReport {
    let emitter = ctx.emitter(&task);
    let result = run(ctx, &mut task, &emitter);

    match &result {
        Ok(()) => {
            task.advance(TransferStatus::Completed);
            tracing::info!(
                url = %task.url,
                path = %task.target.display(),
                bytes = task.bytes_written,
                "transfer completed"
            );
            emitter.emit(EventKind::Completed {
                path: task.target.clone(),
                bytes_written: task.bytes_written,
            });
        }
        Err(e) => {
            task.advance(TransferStatus::Failed);
            tracing::warn!(
                url = %task.url,
                path = %task.target.display(),
                bytes = task.bytes_written,
                class = ?e.class(),
                error = %e,
                "transfer failed"
            );
            emitter.emit(EventKind::Failed {
                class: e.class(),
                reason: e.to_string(),
            });
        }
    }
    TransferReport { task, result }
}

fn run(
    ctx: &TransferContext,
    task: &mut TransferTask,
    emitter: &Emitter,
) -> Result<(), TransferError> {
    let decision = plan_resume(&task.target)?;
    task.resume_offset = decision.start;
    task.bytes_written = decision.start;
    if decision.is_resume() {
        task.advance(TransferStatus::Resuming);
        tracing::debug!(url = %task.url, offset = decision.start, "resuming");
        emitter.emit(EventKind::Resuming {
            path: task.target.clone(),
            offset: decision.start,
        });
    } else {
        task.advance(TransferStatus::Restarting);
        tracing::debug!(url = %task.url, "starting from byte 0");
        emitter.emit(EventKind::Started {
            path: task.target.clone(),
        });
    }

    if ctx.abort.is_aborted() {
        return Err(TransferError::Cancelled);
    }

    let handler = TransferHandler::new(
        task.target.clone(),
        decision,
        emitter.clone(),
        ctx.abort.clone(),
    );
    let mut fetched = ctx
        .client
        .get(&task.url, decision.range_start(), handler)
        .map_err(TransferError::Connection)?;

    let curl_result = fetched.take_result();
    let response_code = fetched.response_code();
    let handler = fetched.handler_mut();

    let outcome = if let Some(failure) = handler.take_failure() {
        Err(failure)
    } else {
        match curl_result {
            Ok(()) => handler.finish(response_code),
            Err(_) if ctx.abort.is_aborted() => Err(TransferError::Cancelled),
            // Once the body started, a curl error means the stream broke.
            Err(e) if handler.resolved().is_some() => Err(TransferError::Stream(e)),
            Err(e) => Err(TransferError::Connection(e)),
        }
    };

    if let Some(resolved) = handler.resolved() {
        task.total_size = resolved.total_size;
        task.bytes_written = handler.bytes_written();
        task.advance(TransferStatus::InProgress);
    }
    outcome
}
