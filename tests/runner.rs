//! Loop mode: interval ticking, reloads and shutdown.
//!
//! Runs on tokio's paused clock so interval arithmetic is exact.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use statuswatch::config::{MonitorConfig, TargetConfig};
use statuswatch::lifecycle::Shutdown;
use statuswatch::notifications::NotifierSet;
use statuswatch::store::{MemoryStore, StateStore};
use statuswatch::Monitor;

mod common;
use common::{ScriptedProber, SlowProber};

const A: &str = "https://a.example/";
const B: &str = "https://b.example/";

fn config(urls: &[&str], interval_secs: u64) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.targets = urls.iter().map(|u| TargetConfig::new(*u)).collect();
    config.schedule.interval_secs = interval_secs;
    config
}

fn scripted(config: MonitorConfig, store: &Arc<MemoryStore>) -> Monitor {
    Monitor::new(config, Arc::new(ScriptedProber::new()), store.clone(), NotifierSet::new())
}

#[tokio::test(start_paused = true)]
async fn test_pass_per_interval_until_shutdown() {
    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(scripted(config(&[A], 10), &store).run(shutdown.subscribe(), None));

    // Passes at t=0, 10 and 20.
    sleep(Duration::from_secs(25)).await;
    assert_eq!(store.save_count(), 3);

    shutdown.trigger();
    timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

    sleep(Duration::from_secs(60)).await;
    assert_eq!(store.save_count(), 3);
    assert_eq!(store.read_all().unwrap().get(A).unwrap().stable_streak, 3);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_long_pass_skips_overdue_tick() {
    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let monitor = Monitor::new(
        config(&[A], 10),
        Arc::new(SlowProber {
            delay: Duration::from_secs(15),
        }),
        store.clone(),
        NotifierSet::new(),
    );
    let handle = tokio::spawn(monitor.run(shutdown.subscribe(), None));

    // Mid-way through the first pass; the t=10 tick is overdue when it ends.
    sleep(Duration::from_secs(5)).await;
    shutdown.trigger();

    timeout(Duration::from_secs(11), handle).await.unwrap().unwrap();
    assert_eq!(store.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_valid_reload_applies_before_next_pass() {
    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(scripted(config(&[A], 10), &store).run(shutdown.subscribe(), Some(rx)));

    sleep(Duration::from_secs(5)).await;
    assert_eq!(store.read_all().unwrap().len(), 1);

    tx.send(config(&[A, B], 10)).unwrap();
    sleep(Duration::from_secs(10)).await;

    let snapshot = store.read_all().unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(A).unwrap().stable_streak, 2);
    assert_eq!(snapshot.get(B).unwrap().stable_streak, 1);

    shutdown.trigger();
    timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_invalid_reload_keeps_current_config() {
    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(scripted(config(&[A], 10), &store).run(shutdown.subscribe(), Some(rx)));

    sleep(Duration::from_secs(5)).await;
    // Zero interval fails validation; the new target must not appear.
    tx.send(config(&[A, B], 0)).unwrap();
    sleep(Duration::from_secs(10)).await;

    let snapshot = store.read_all().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(A).unwrap().stable_streak, 2);

    // Still on the original 10s interval.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(store.save_count(), 3);

    shutdown.trigger();
    timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_restarts_ticker() {
    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(scripted(config(&[A], 10), &store).run(shutdown.subscribe(), Some(rx)));

    sleep(Duration::from_secs(5)).await;
    tx.send(config(&[A], 30)).unwrap();

    // Applied at the t=10 tick; the next pass is due at t=40.
    sleep(Duration::from_secs(30)).await;
    assert_eq!(store.save_count(), 2);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(store.save_count(), 3);

    shutdown.trigger();
    timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}
