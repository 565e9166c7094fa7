//! Batch coordinator: one task per URL, all joined before returning.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::TransferError;
use crate::transfer::{reject, run_transfer, TransferContext, TransferReport, TransferTask};
use crate::url_model::derive_filename;

use super::gate::ConcurrencyGate;
use super::report::BatchReport;

/// Builds tasks for `urls` under `download_dir`.
///
/// Blank entries are dropped. A URL whose target path was already claimed by
/// an earlier URL comes back with a `DuplicateTarget` error and must not run.
pub fn plan_batch<S: AsRef<str>>(
    urls: &[S],
    download_dir: &Path,
) -> Vec<(TransferTask, Option<TransferError>)> {
    let mut claimed = HashSet::new();
    urls.iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .enumerate()
        .map(|(id, url)| {
            let target = download_dir.join(derive_filename(url));
            let conflict = if claimed.insert(target.clone()) {
                None
            } else {
                Some(TransferError::DuplicateTarget(target.clone()))
            };
            (TransferTask::new(id, url, target), conflict)
        })
        .collect()
}

/// Runs every URL as its own task through `gate` and waits for all of them.
///
/// One task's failure never affects another; the report holds one entry per
/// non-blank URL, in input order.
pub async fn run_batch<S: AsRef<str>>(
    urls: &[S],
    download_dir: &Path,
    gate: Arc<ConcurrencyGate>,
    ctx: TransferContext,
) -> BatchReport {
    let planned = plan_batch(urls, download_dir);
    tracing::info!(
        tasks = planned.len(),
        capacity = gate.capacity(),
        dir = %download_dir.display(),
        "starting batch"
    );

    let mut slots: Vec<Option<TransferReport>> = Vec::with_capacity(planned.len());
    let mut snapshots = Vec::with_capacity(planned.len());
    let mut join_set = tokio::task::JoinSet::new();

    for (index, (task, conflict)) in planned.into_iter().enumerate() {
        snapshots.push(task.clone());
        if let Some(err) = conflict {
            slots.push(Some(reject(&ctx, task, err)));
            continue;
        }
        slots.push(None);
        let ctx = ctx.clone();
        let gate = Arc::clone(&gate);
        join_set.spawn(async move { (index, run_transfer(ctx, task, &gate).await) });
    }

    while let Some(res) = join_set.join_next().await {
        match res {
            Ok((index, report)) => slots[index] = Some(report),
            Err(e) => tracing::error!(error = %e, "batch task failed to join"),
        }
    }

    let reports: Vec<TransferReport> = slots
        .into_iter()
        .zip(snapshots)
        .map(|(slot, task)| {
            slot.unwrap_or_else(|| {
                reject(&ctx, task, TransferError::Internal("task panicked".to_string()))
            })
        })
        .collect();
    let batch = BatchReport { reports };
    tracing::info!(
        succeeded = batch.succeeded(),
        failed = batch.failed(),
        peak = gate.peak_admitted(),
        "batch finished"
    );
    batch
}
