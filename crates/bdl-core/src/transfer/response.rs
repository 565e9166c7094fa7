//! Interpretation of the server's answer to a resume decision.

use crate::error::TransferError;
use crate::fetch::ResponseHead;
use crate::resume::{ResumeDecision, WriteMode};

/// What the response turned the plan into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Full content for a download that started at byte 0.
    Fresh,
    /// 206 to a range request: continue after the local bytes.
    Resumed,
    /// 200 to a range request: the server ignored the range, start over.
    Restarted,
}

/// Resolved write plan for the body actually being received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTransfer {
    pub kind: ResponseKind,
    pub mode: WriteMode,
    /// Offset of the first body byte within the resource.
    pub start: u64,
    /// Full resource size, only when this response declares it.
    pub total_size: Option<u64>,
}

/// Maps the response status to a write plan.
///
/// The total size is always derived from the response actually received;
/// after a restart fallback the size planned for the resume is never reused.
pub fn interpret_response(
    decision: &ResumeDecision,
    head: &ResponseHead,
) -> Result<ResolvedTransfer, TransferError> {
    match head.status {
        206 if decision.is_resume() => Ok(ResolvedTransfer {
            kind: ResponseKind::Resumed,
            mode: WriteMode::Append,
            start: decision.start,
            total_size: head
                .content_length
                .and_then(|remaining| remaining.checked_add(decision.start)),
        }),
        // 206 without a range request starts at byte 0 as well.
        200 | 206 if !decision.is_resume() => Ok(ResolvedTransfer {
            kind: ResponseKind::Fresh,
            mode: WriteMode::CreateTruncate,
            start: 0,
            total_size: head.content_length,
        }),
        200 => Ok(ResolvedTransfer {
            kind: ResponseKind::Restarted,
            mode: WriteMode::CreateTruncate,
            start: 0,
            total_size: head.content_length,
        }),
        other => Err(TransferError::Protocol(other)),
    }
}
