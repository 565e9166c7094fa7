//! Shared batch runner for `bdl run` and `bdl get`.

use anyhow::{Context, Result};
use bdl_core::config::BdlConfig;
use bdl_core::control::AbortToken;
use bdl_core::fetch::HttpClient;
use bdl_core::scheduler::{self, BatchReport, ConcurrencyGate};
use bdl_core::transfer::{EventKind, TransferContext, TransferEvent};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Flags shared by the batch commands.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub jobs: Option<usize>,
    pub dir: Option<PathBuf>,
    pub json: bool,
}

pub(super) async fn run_urls(cfg: &BdlConfig, urls: &[String], opts: BatchOptions) -> Result<()> {
    let download_dir = opts.dir.unwrap_or_else(|| cfg.download_dir.clone());
    std::fs::create_dir_all(&download_dir).with_context(|| {
        format!("failed to create download directory {}", download_dir.display())
    })?;
    let jobs = opts.jobs.unwrap_or(cfg.max_concurrent);

    let gate = Arc::new(ConcurrencyGate::new(jobs));
    let abort = AbortToken::new();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let ctx = TransferContext::new(HttpClient::from_config(cfg))
        .with_events(tx)
        .with_abort(abort.clone());

    let printer = tokio::spawn(print_events(rx, opts.json));
    let interrupt = tokio::spawn({
        let gate = Arc::clone(&gate);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted, stopping transfers...");
                tracing::warn!("interrupt received, cancelling batch");
                abort.request_abort();
                gate.close();
            }
        }
    });

    let started = Instant::now();
    let report = scheduler::run_batch(urls, &download_dir, gate, ctx).await;
    interrupt.abort();
    // All senders are gone once the batch returns, so the printer drains and ends.
    let _ = printer.await;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report.records())?);
    } else {
        print_summary(&report, started.elapsed());
    }
    Ok(())
}

/// Prints one status line per lifecycle event; progress is throttled per task.
async fn print_events(mut rx: tokio::sync::mpsc::UnboundedReceiver<TransferEvent>, quiet: bool) {
    let mut last_progress: HashMap<usize, Instant> = HashMap::new();
    while let Some(ev) = rx.recv().await {
        if quiet {
            continue;
        }
        if let Some(line) = render_event(&ev, &mut last_progress) {
            println!("{}", line);
        }
    }
}

fn render_event(ev: &TransferEvent, last_progress: &mut HashMap<usize, Instant>) -> Option<String> {
    let line = match &ev.kind {
        EventKind::Started { path } => format!("Starting {} -> {}", ev.url, path.display()),
        EventKind::Resuming { path, offset } => {
            format!("Resuming {} from byte {} -> {}", ev.url, offset, path.display())
        }
        EventKind::ResumeConfirmed { offset, total } => format!(
            "Server accepted range for {} ({} of {} bytes already local)",
            ev.url,
            offset,
            fmt_total(*total)
        ),
        EventKind::RestartFallback { discarded, .. } => format!(
            "Server ignored range for {}, restarting ({} local bytes discarded)",
            ev.url, discarded
        ),
        EventKind::Progress { bytes_written, .. } => {
            let fraction = ev.kind.fraction()?;
            let now = Instant::now();
            let due = last_progress
                .get(&ev.task)
                .map_or(true, |t| now.duration_since(*t) >= PROGRESS_INTERVAL);
            if !due && fraction < 1.0 {
                return None;
            }
            last_progress.insert(ev.task, now);
            format!(
                "  {} {:.1}% ({} bytes)",
                ev.url,
                fraction * 100.0,
                bytes_written
            )
        }
        EventKind::Completed {
            path,
            bytes_written,
        } => {
            last_progress.remove(&ev.task);
            format!(
                "Completed {} -> {} ({} bytes)",
                ev.url,
                path.display(),
                bytes_written
            )
        }
        EventKind::Failed { reason, .. } => {
            last_progress.remove(&ev.task);
            format!("Failed {}: {}", ev.url, reason)
        }
    };
    Some(line)
}

fn fmt_total(total: Option<u64>) -> String {
    total.map_or_else(|| "?".to_string(), |t| t.to_string())
}

fn print_summary(report: &BatchReport, elapsed: Duration) {
    println!();
    println!(
        "Batch finished in {:.1}s: {} completed, {} failed.",
        elapsed.as_secs_f64(),
        report.succeeded(),
        report.failed()
    );
    for r in report.reports.iter().filter(|r| !r.is_success()) {
        if let Some(err) = r.error() {
            println!("  {}: {}", r.task.url, err);
        }
    }
}
