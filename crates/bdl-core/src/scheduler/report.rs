//! Batch outcome.

use serde::Serialize;

use crate::error::ErrorClass;
use crate::transfer::TransferReport;

/// Reports of every task of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<TransferReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Flat, serializable view of each report (for `--json`).
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.reports.iter().map(OutcomeRecord::from).collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutcomeRecord {
    pub url: String,
    pub path: String,
    pub status: &'static str,
    pub bytes_written: u64,
    pub total_size: Option<u64>,
    pub error: Option<String>,
    pub error_class: Option<ErrorClass>,
}

impl From<&TransferReport> for OutcomeRecord {
    fn from(r: &TransferReport) -> Self {
        Self {
            url: r.task.url.clone(),
            path: r.task.target.display().to_string(),
            status: r.task.status.as_str(),
            bytes_written: r.task.bytes_written,
            total_size: r.task.total_size,
            error: r.error().map(|e| e.to_string()),
            error_class: r.error().map(|e| e.class()),
        }
    }
}
