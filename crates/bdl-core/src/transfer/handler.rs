//! curl `Handler` for one transfer.
//! Interprets the status before the first body byte, then writes every
//! received chunk straight to the target file.

use std::path::PathBuf;
use std::str;

use curl::easy::{Handler, WriteError};

use crate::control::AbortToken;
use crate::error::TransferError;
use crate::fetch::{parse_head, ResponseHead};
use crate::resume::ResumeDecision;
use crate::storage::TargetFile;

use super::events::{Emitter, EventKind};
use super::response::{interpret_response, ResolvedTransfer, ResponseKind};

/// Handler state for one transfer. Owns the target file handle, so the file
/// is closed whenever the handler is dropped.
pub struct TransferHandler {
    target: PathBuf,
    decision: ResumeDecision,
    /// Header lines of the current (last) response; reset on each status line.
    response_headers: Vec<String>,
    resolved: Option<ResolvedTransfer>,
    file: Option<TargetFile>,
    bytes_written: u64,
    /// First failure seen inside a callback; wins over libcurl's own error.
    failure: Option<TransferError>,
    emitter: Emitter,
    abort: AbortToken,
}

impl TransferHandler {
    pub(crate) fn new(
        target: PathBuf,
        decision: ResumeDecision,
        emitter: Emitter,
        abort: AbortToken,
    ) -> Self {
        Self {
            target,
            decision,
            response_headers: Vec::new(),
            resolved: None,
            file: None,
            bytes_written: 0,
            failure: None,
            emitter,
            abort,
        }
    }

    /// Write plan chosen from the response, once the head has been seen.
    pub fn resolved(&self) -> Option<&ResolvedTransfer> {
        self.resolved.as_ref()
    }

    /// Bytes of the resource now present in the target file.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub(crate) fn take_failure(&mut self) -> Option<TransferError> {
        self.failure.take()
    }

    /// Interprets `head` and opens the target file in the resolved mode.
    fn begin(&mut self, head: ResponseHead) -> Result<(), TransferError> {
        let resolved = interpret_response(&self.decision, &head)?;
        let file = TargetFile::open(&self.target, resolved.mode).map_err(TransferError::Storage)?;

        match resolved.kind {
            ResponseKind::Resumed => {
                tracing::info!(
                    path = %self.target.display(),
                    offset = resolved.start,
                    "server confirmed resume, appending"
                );
                self.emitter.emit(EventKind::ResumeConfirmed {
                    offset: resolved.start,
                    total: resolved.total_size,
                });
            }
            ResponseKind::Restarted => {
                tracing::info!(
                    path = %self.target.display(),
                    discarded = self.decision.start,
                    "server ignored range, restarting from scratch"
                );
                self.emitter.emit(EventKind::RestartFallback {
                    discarded: self.decision.start,
                    total: resolved.total_size,
                });
            }
            ResponseKind::Fresh => {}
        }

        self.bytes_written = resolved.start;
        self.resolved = Some(resolved);
        self.file = Some(file);
        Ok(())
    }

    fn current_head(&self) -> Option<ResponseHead> {
        parse_head(&self.response_headers)
    }

    /// Completes a transfer that libcurl reported as successful: resolves the
    /// response if no body byte arrived (empty body), then flushes the file.
    /// `response_code` stands in when no status line was captured.
    pub(crate) fn finish(&mut self, response_code: Option<u32>) -> Result<(), TransferError> {
        if self.resolved.is_none() {
            let head = self
                .current_head()
                .or_else(|| {
                    response_code.map(|status| ResponseHead {
                        status,
                        content_length: None,
                    })
                })
                .ok_or_else(|| TransferError::Internal("response without status".to_string()))?;
            self.begin(head)?;
        }
        if let Some(file) = self.file.as_ref() {
            file.sync().map_err(TransferError::Storage)?;
        }
        Ok(())
    }

    fn fail(&mut self, err: TransferError) -> Result<usize, WriteError> {
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        // Returning fewer bytes than offered makes libcurl abort the transfer.
        Ok(0)
    }
}

impl Handler for TransferHandler {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(s) = str::from_utf8(data) {
            let line = s.trim_end();
            if line.starts_with("HTTP/") {
                self.response_headers.clear();
            }
            self.response_headers.push(line.to_string());
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.abort.is_aborted() {
            return self.fail(TransferError::Cancelled);
        }
        if self.resolved.is_none() {
            let Some(head) = self.current_head() else {
                return self.fail(TransferError::Internal(
                    "body arrived before status line".to_string(),
                ));
            };
            if let Err(e) = self.begin(head) {
                return self.fail(e);
            }
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        if let Err(e) = file.write_chunk(data) {
            return self.fail(TransferError::Storage(e));
        }
        self.bytes_written += data.len() as u64;
        self.emitter.emit(EventKind::Progress {
            bytes_written: self.bytes_written,
            total: self.resolved.and_then(|r| r.total_size),
        });
        Ok(data.len())
    }

    fn progress(&mut self, _dltotal: f64, _dlnow: f64, _ultotal: f64, _ulnow: f64) -> bool {
        if self.abort.is_aborted() {
            if self.failure.is_none() {
                self.failure = Some(TransferError::Cancelled);
            }
            return false;
        }
        true
    }
}
