//! Contract Test: Scheduler Timing
//!
//! Verifies the fixed-interval repetition of the update loop.
//!
//! Constraints verified:
//! - The first update fires immediately
//! - Later updates are spaced `interval` after the previous one COMPLETES
//! - Failures never stop the loop
//! - A zero interval is rejected instead of spinning

mod common;

use common::*;
use noip_core::{
    ChannelObserver, Error, NoIpClient, UpdateOutcome, UpdateScheduler, Updater,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::test]
async fn one_second_interval_against_registrar() {
    let registrar = MockRegistrar::start("good 203.0.113.5").await;
    let client = Arc::new(
        NoIpClient::new("alice", "s3cr3t", "home.ddns.net", "", "")
            .with_endpoint(registrar.endpoint()),
    );

    let handle = client.run(1, false).expect("non-zero interval accepted");

    tokio::time::sleep(Duration::from_millis(3500)).await;
    handle.shutdown().await;

    let calls = registrar.request_count();
    assert!(
        (3..=5).contains(&calls),
        "expected 3..=5 update calls in ~3.5s, got {}",
        calls
    );
}

#[tokio::test(start_paused = true)]
async fn ticks_follow_the_interval() {
    let updater = CountingUpdater::new("home.ddns.net");
    let calls = updater.calls();

    let handle = UpdateScheduler::new(Arc::new(updater), 10)
        .expect("scheduler construction succeeds")
        .spawn();

    // Ticks at t=0, 10, 20 and 30
    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(count(&calls), 4);
    assert_eq!(handle.ticks(), 4);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn interval_is_measured_from_completion() {
    let updater = CountingUpdater::new("home.ddns.net").with_latency(Duration::from_secs(5));
    let calls = updater.calls();

    let handle = UpdateScheduler::new(Arc::new(updater), 10)
        .expect("scheduler construction succeeds")
        .spawn();

    // Updates start at t=0, 15 and 30; the third is still in flight at t=34
    tokio::time::sleep(Duration::from_secs(34)).await;
    assert_eq!(count(&calls), 3, "three updates started");
    assert_eq!(handle.ticks(), 2, "two updates completed");

    handle.shutdown().await;
    assert_eq!(count(&calls), 3);
}

#[tokio::test(start_paused = true)]
async fn failures_do_not_stop_the_loop() {
    let updater = CountingUpdater::new("home.ddns.net").failing();
    let (observer, stream) = ChannelObserver::new(16);

    let handle = UpdateScheduler::new(Arc::new(updater), 5)
        .expect("scheduler construction succeeds")
        .with_observer(Arc::new(observer))
        .spawn();

    tokio::time::sleep(Duration::from_secs(12)).await;
    handle.shutdown().await;

    let outcomes: Vec<UpdateOutcome> = stream.collect().await;
    assert_eq!(outcomes.len(), 3);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.tick(), i as u64 + 1);
        assert!(
            matches!(outcome, UpdateOutcome::Failed { error, .. } if error.contains("simulated failure")),
            "tick {} should report the failure, got {:?}",
            i + 1,
            outcome
        );
    }
}

#[tokio::test(start_paused = true)]
async fn observer_sees_raw_bodies() {
    let updater = CountingUpdater::new("home.ddns.net");
    let (observer, mut stream) = ChannelObserver::new(16);

    let handle = UpdateScheduler::new(Arc::new(updater), 60)
        .expect("scheduler construction succeeds")
        .with_observer(Arc::new(observer))
        .spawn();

    let first = stream.next().await.expect("first outcome");
    handle.shutdown().await;

    match first {
        UpdateOutcome::Completed {
            hostname,
            tick,
            body,
            ..
        } => {
            assert_eq!(hostname, "home.ddns.net");
            assert_eq!(tick, 1);
            assert_eq!(body, "good 203.0.113.1");
        }
        other => panic!("expected a completed tick, got {:?}", other),
    }
}

#[tokio::test]
async fn zero_interval_is_rejected() {
    let client = Arc::new(NoIpClient::new("alice", "s3cr3t", "home.ddns.net", "", ""));

    let err = client.run(0, true).expect_err("zero interval must be rejected");
    assert!(matches!(err, Error::InvalidInput(_)));

    let updater: Arc<dyn Updater> = Arc::new(CountingUpdater::new("home.ddns.net"));
    assert!(UpdateScheduler::new(updater, 0).is_err());
}
