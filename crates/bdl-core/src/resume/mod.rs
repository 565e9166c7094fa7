//! Resume planning.
//!
//! Decides, from the target file's current size alone, whether a transfer
//! starts from byte 0 or asks the server for the remaining bytes. No network
//! access happens here.

use std::io;
use std::path::Path;

use crate::error::TransferError;

/// How the target file is opened once the response is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create the file or discard its content.
    CreateTruncate,
    /// Keep existing bytes and write after them.
    Append,
}

/// Plan for one request attempt. Derived per attempt, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeDecision {
    /// Byte offset the transfer continues from (the existing file size).
    pub start: u64,
    /// Mode the file would be opened in if the server honors the plan.
    pub mode: WriteMode,
}

impl ResumeDecision {
    pub fn fresh() -> Self {
        Self {
            start: 0,
            mode: WriteMode::CreateTruncate,
        }
    }

    pub fn resume_from(start: u64) -> Self {
        Self {
            start,
            mode: WriteMode::Append,
        }
    }

    /// True when the request carries a range header.
    pub fn is_resume(&self) -> bool {
        self.mode == WriteMode::Append && self.start > 0
    }

    /// First byte of the open-ended range to request, if any.
    pub fn range_start(&self) -> Option<u64> {
        self.is_resume().then_some(self.start)
    }

    /// The `Range` header value this decision sends, if any.
    pub fn range_header(&self) -> Option<String> {
        self.range_start().map(|s| format!("bytes={}-", s))
    }
}

/// Inspects `path` and returns the resume decision for it.
///
/// A missing or empty file starts fresh; a file of size `S > 0` resumes at `S`.
/// Any other filesystem error is a planning failure for this task only.
pub fn plan_resume(path: &Path) -> Result<ResumeDecision, TransferError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(TransferError::Planning {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "target is a directory"),
        }),
        Ok(meta) if meta.len() > 0 => Ok(ResumeDecision::resume_from(meta.len())),
        Ok(_) => Ok(ResumeDecision::fresh()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ResumeDecision::fresh()),
        Err(e) => Err(TransferError::Planning {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
