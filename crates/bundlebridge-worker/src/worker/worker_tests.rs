#![allow(non_snake_case)]
#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

#[test]
fn WorkerConfig___default___names_the_thread() {
    let config = WorkerConfig::default();

    assert_eq!(config.thread_name, "bundlebridge-worker");
}

#[test]
fn WorkerConfig___with_thread_name___overrides_default() {
    let config = WorkerConfig::new().with_thread_name("asset-worker");

    assert_eq!(config.thread_name, "asset-worker");
}

#[test]
fn BridgeWorker___submit___runs_job_on_worker_thread() {
    let worker = BridgeWorker::with_defaults().unwrap();
    let (tx, rx) = std_mpsc::channel();

    worker
        .submit(move || {
            let name = thread::current().name().map(str::to_owned);
            let _ = tx.send(name);
        })
        .unwrap();

    let name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(name.as_deref(), Some("bundlebridge-worker"));
}

#[test]
fn BridgeWorker___submit___fifo_even_when_first_job_is_slow() {
    let worker = BridgeWorker::with_defaults().unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = std_mpsc::channel();

    let slow_order = order.clone();
    worker
        .submit(move || {
            thread::sleep(Duration::from_millis(100));
            slow_order.lock().push("slow");
        })
        .unwrap();
    let fast_order = order.clone();
    worker
        .submit(move || {
            fast_order.lock().push("fast");
            let _ = done_tx.send(());
        })
        .unwrap();

    done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(*order.lock(), vec!["slow", "fast"]);
}

#[test]
fn BridgeWorker___submit___many_jobs_complete_in_submission_order() {
    let worker = BridgeWorker::with_defaults().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = std_mpsc::channel();

    for i in 0..64usize {
        let seen = seen.clone();
        let done_tx = done_tx.clone();
        worker
            .submit(move || {
                seen.lock().push(i);
                if i == 63 {
                    let _ = done_tx.send(());
                }
            })
            .unwrap();
    }

    done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(*seen.lock(), (0..64).collect::<Vec<_>>());
}

#[test]
fn BridgeWorker___stop___rejects_later_submissions() {
    let worker = BridgeWorker::with_defaults().unwrap();

    worker.stop();
    let result = worker.submit(|| {});

    assert!(result.is_err());
}

#[test]
fn BridgeWorker___stop___drops_queued_jobs_but_finishes_in_flight() {
    let worker = BridgeWorker::with_defaults().unwrap();
    let ran = Arc::new(AtomicUsize::new(0));
    let (started_tx, started_rx) = std_mpsc::channel();
    let (release_tx, release_rx) = std_mpsc::channel::<()>();

    let in_flight_ran = ran.clone();
    worker
        .submit(move || {
            let _ = started_tx.send(());
            // hold the worker until stop() has been called
            let _ = release_rx.recv_timeout(Duration::from_secs(2));
            in_flight_ran.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    let queued_ran = ran.clone();
    worker
        .submit(move || {
            queued_ran.fetch_add(100, Ordering::SeqCst);
        })
        .unwrap();

    started_rx.recv_timeout(Duration::from_secs(1)).unwrap();
    let stopper = {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            let _ = release_tx.send(());
        })
    };
    worker.stop();
    stopper.join().unwrap();

    // in-flight job completed, queued job was dropped
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn BridgeWorker___shutdown_signal___observes_stop() {
    let worker = BridgeWorker::with_defaults().unwrap();
    let signal = worker.shutdown_signal();

    worker.stop();

    assert!(signal.is_triggered());
    assert!(worker.is_shutting_down());
}
