//! Integration test: batches against a local range server.
//!
//! Checks the concurrency cap, failure isolation between tasks and
//! cancellation of a running batch.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use bdl_core::control::AbortToken;
use bdl_core::error::ErrorClass;
use bdl_core::scheduler::{run_batch, ConcurrencyGate};
use bdl_core::transfer::{EventKind, TransferStatus};
use common::range_server::{self, RangeServerOptions};
use tempfile::tempdir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_urls_capacity_two_all_complete() {
    let body = common::body(1000);
    let server = range_server::start_with_options(
        body.clone(),
        RangeServerOptions {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        },
    );
    let urls: Vec<String> = (0..5).map(|i| server.url(&format!("file{}.bin", i))).collect();

    let dir = tempdir().unwrap();
    let gate = Arc::new(ConcurrencyGate::new(2));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let ctx = common::context().with_events(tx);

    let batch = run_batch(&urls, dir.path(), Arc::clone(&gate), ctx).await;

    assert_eq!(batch.reports.len(), 5);
    assert_eq!(batch.succeeded(), 5, "{:?}", batch.records());
    for (i, report) in batch.reports.iter().enumerate() {
        assert_eq!(report.task.url, urls[i], "reports keep input order");
        assert_eq!(report.task.status, TransferStatus::Completed);
        assert_eq!(report.task.bytes_written, 1000);
        assert_eq!(report.task.total_size, Some(1000));
        let content = std::fs::read(dir.path().join(format!("file{}.bin", i))).unwrap();
        assert_eq!(content, body);
    }
    assert!(gate.peak_admitted() <= 2, "peak {}", gate.peak_admitted());
    assert_eq!(gate.admitted(), 0);

    let mut completed = 0;
    while let Ok(ev) = rx.try_recv() {
        if let EventKind::Progress { .. } = ev.kind {
            assert!(ev.kind.fraction().unwrap() <= 1.0);
        }
        if matches!(ev.kind, EventKind::Completed { .. }) {
            completed += 1;
        }
    }
    assert_eq!(completed, 5);

    for req in server.requests() {
        assert_eq!(req.range, None, "fresh downloads send no range");
        assert_eq!(req.user_agent.as_deref(), Some(common::TEST_USER_AGENT));
    }
}

#[tokio::test]
async fn failures_do_not_affect_other_tasks() {
    let body = common::body(1000);
    let good = range_server::start(body.clone());
    let missing = range_server::start_with_options(
        body.clone(),
        RangeServerOptions {
            force_status: Some(404),
            ..Default::default()
        },
    );
    let urls = vec![
        good.url("ok-a.bin"),
        missing.url("missing.bin"),
        common::dead_url("refused.bin"),
        good.url("ok-b.bin"),
    ];

    let dir = tempdir().unwrap();
    let gate = Arc::new(ConcurrencyGate::new(3));
    let batch = run_batch(&urls, dir.path(), gate, common::context()).await;

    assert_eq!(batch.succeeded(), 2);
    assert_eq!(batch.failed(), 2);
    assert!(batch.reports[0].is_success());
    assert!(batch.reports[3].is_success());

    let not_found = batch.reports[1].error().unwrap();
    assert_eq!(not_found.class(), ErrorClass::Protocol);
    assert_eq!(not_found.to_string(), "HTTP 404");
    assert!(!dir.path().join("missing.bin").exists(), "error body must not be saved");

    let refused = batch.reports[2].error().unwrap();
    assert_eq!(refused.class(), ErrorClass::Connection);
    assert_eq!(batch.reports[2].task.status, TransferStatus::Failed);

    assert_eq!(std::fs::read(dir.path().join("ok-b.bin")).unwrap(), body);

    let records = batch.records();
    assert_eq!(records[1].status, "failed");
    assert_eq!(records[1].error_class, Some(ErrorClass::Protocol));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn abort_cancels_running_and_waiting_tasks() {
    let server = range_server::start_with_options(
        common::body(1000),
        RangeServerOptions {
            delay: Some(Duration::from_secs(6)),
            ..Default::default()
        },
    );
    let urls: Vec<String> = (0..3).map(|i| server.url(&format!("slow{}.bin", i))).collect();

    let dir = tempdir().unwrap();
    let gate = Arc::new(ConcurrencyGate::new(1));
    let abort = AbortToken::new();
    let ctx = common::context().with_abort(abort.clone());

    let started = Instant::now();
    let run = tokio::spawn({
        let gate = Arc::clone(&gate);
        let dir = dir.path().to_path_buf();
        async move { run_batch(&urls, &dir, gate, ctx).await }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    abort.request_abort();
    gate.close();

    let batch = run.await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5), "abort took too long");
    assert_eq!(batch.reports.len(), 3);
    for report in &batch.reports {
        assert_eq!(report.task.status, TransferStatus::Failed);
        assert_eq!(report.error().unwrap().class(), ErrorClass::Cancelled);
    }
    assert_eq!(gate.peak_admitted(), 1);
}
