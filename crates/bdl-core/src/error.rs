//! Per-task failure type and its classification.
//!
//! Every failure of a transfer ends up as a `TransferError` stored in the
//! task's report; none of them abort the batch.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// High-level failure category reported with each failed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// Local filesystem could not be inspected before the request.
    Planning,
    /// Transport failed before any body byte arrived (DNS, refused, reset).
    Connection,
    /// Server answered with a status other than 200 or 206.
    Protocol,
    /// Transfer broke mid-body (connection drop or disk write failure).
    Stream,
    /// Stopped on user request.
    Cancelled,
    /// The task itself panicked.
    Internal,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("cannot inspect {}: {source}", .path.display())]
    Planning {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target {} is already claimed by another URL in this batch", .0.display())]
    DuplicateTarget(PathBuf),

    #[error("connection failed: {0}")]
    Connection(#[source] curl::Error),

    #[error("{}", protocol_message(.0))]
    Protocol(u32),

    #[error("stream interrupted: {0}")]
    Stream(#[source] curl::Error),

    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),

    #[error("cancelled")]
    Cancelled,

    #[error("transfer task failed: {0}")]
    Internal(String),
}

fn protocol_message(status: &u32) -> String {
    match *status {
        416 => "HTTP 416 range not satisfiable (local file may already be complete)".to_string(),
        _ => format!("HTTP {}", status),
    }
}

impl TransferError {
    /// Category of this failure (storage failures count as stream errors).
    pub fn class(&self) -> ErrorClass {
        match self {
            TransferError::Planning { .. } | TransferError::DuplicateTarget(_) => {
                ErrorClass::Planning
            }
            TransferError::Connection(_) => ErrorClass::Connection,
            TransferError::Protocol(_) => ErrorClass::Protocol,
            TransferError::Stream(_) | TransferError::Storage(_) => ErrorClass::Stream,
            TransferError::Cancelled => ErrorClass::Cancelled,
            TransferError::Internal(_) => ErrorClass::Internal,
        }
    }
}
