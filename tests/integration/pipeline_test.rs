use std::collections::VecDeque;
use std::time::Duration;

use logmon::core::config::MonitorConfig;
use logmon::core::log_monitor::{
    event_stream, spawn_all_tasks, AlertEvent, FileTailer, LineSource, MetricsSnapshot,
    MonitorRuntime, MonitorShared,
};
use logmon::{LogmonError, Result};
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::time::timeout;

/// Source that hands out prepared batches, then nothing
struct ScriptedSource {
    batches: VecDeque<Result<Vec<String>>>,
}

impl ScriptedSource {
    fn new(batches: Vec<Result<Vec<String>>>) -> Box<dyn LineSource> {
        Box::new(Self {
            batches: batches.into(),
        })
    }
}

impl LineSource for ScriptedSource {
    fn poll_lines(&mut self) -> Result<Vec<String>> {
        self.batches.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn lines(path: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            format!(
                r#"10.0.0.1 - - [09/May/2018:16:00:39 +0000] "GET {} HTTP/1.1" 200 50"#,
                path
            )
        })
        .collect()
}

fn test_config() -> MonitorConfig {
    MonitorConfig {
        collection_interval_seconds: 10,
        alert_interval_seconds: 20,
        alert_threshold: 1.0,
        ..Default::default()
    }
}

const WAIT: Duration = Duration::from_secs(120);

#[tokio::test(start_paused = true)]
async fn test_snapshots_and_alerts_flow() {
    let config = test_config();
    let shared = MonitorShared::new();
    let (snapshot_tx, mut snapshots) = event_stream::<MetricsSnapshot>("snapshot", 16);
    let (alert_tx, mut alerts) = event_stream::<AlertEvent>("alert", 16);
    let (shutdown_tx, _) = broadcast::channel(1);

    let mut batch = lines("/api/users", 20);
    batch.extend(lines("/static/app.js", 10));
    batch.push("garbage".to_string());
    let source = ScriptedSource::new(vec![Ok(batch)]);

    spawn_all_tasks(
        &config,
        shared.clone(),
        Some(source),
        snapshot_tx,
        alert_tx,
        &shutdown_tx,
    )
    .unwrap();

    // t = 10s
    let first = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert_eq!(first.total_hits, 30);
    assert_eq!(first.total_bytes, 1500);
    assert_eq!(first.top_sections[0].name, "/api");
    assert_eq!(first.top_sections[0].hits, 20);
    assert_eq!(first.top_sections[1].name, "/static");
    assert_eq!(first.return_codes.get(&200), Some(&30));
    assert_eq!(shared.stats.skipped(), 1);

    // t = 20s: 30 hits over 20s is above 1 hit/s
    let triggered = timeout(WAIT, alerts.recv()).await.unwrap().unwrap();
    match triggered {
        AlertEvent::Triggered { rate, .. } => assert!((rate - 1.5).abs() < 1e-9),
        other => panic!("expected trigger, got {:?}", other),
    }

    let second = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert_eq!(second.total_hits, 0);

    // t = 40s: no traffic since the last evaluation
    let recovered = timeout(WAIT, alerts.recv()).await.unwrap().unwrap();
    assert!(matches!(recovered, AlertEvent::Recovered { .. }));

    shutdown_tx.send(()).unwrap();

    // Streams close once the tasks have exited
    timeout(WAIT, async { while snapshots.recv().await.is_some() {} })
        .await
        .unwrap();
    timeout(WAIT, async { while alerts.recv().await.is_some() {} })
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_source_error_keeps_periodic_tasks_running() {
    let config = test_config();
    let shared = MonitorShared::new();
    let (snapshot_tx, mut snapshots) = event_stream::<MetricsSnapshot>("snapshot", 16);
    let (alert_tx, _alerts) = event_stream::<AlertEvent>("alert", 16);
    let (shutdown_tx, _) = broadcast::channel(1);

    let source = ScriptedSource::new(vec![
        Ok(lines("/pages", 5)),
        Err(LogmonError::source_unavailable("disk went away")),
        Ok(lines("/pages", 100)),
    ]);

    spawn_all_tasks(
        &config,
        shared.clone(),
        Some(source),
        snapshot_tx,
        alert_tx,
        &shutdown_tx,
    )
    .unwrap();

    let first = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert_eq!(first.total_hits, 5);

    let error = shared.stats.source_error().unwrap();
    assert!(error.contains("disk went away"));

    // Ingestion is gone but snapshots keep coming
    let second = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert_eq!(second.total_hits, 0);
    assert_eq!(shared.store.hits.total(), 5);

    shutdown_tx.send(()).unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_slow_consumer_loses_oldest_snapshots() {
    let config = MonitorConfig {
        collection_interval_seconds: 1,
        ..test_config()
    };
    let shared = MonitorShared::new();
    let (snapshot_tx, mut snapshots) = event_stream::<MetricsSnapshot>("snapshot", 2);
    let (alert_tx, _alerts) = event_stream::<AlertEvent>("alert", 2);
    let (shutdown_tx, _) = broadcast::channel(1);

    spawn_all_tasks(&config, shared, None, snapshot_tx, alert_tx, &shutdown_tx).unwrap();

    // Five snapshots published while nobody reads
    tokio::time::sleep(Duration::from_millis(5500)).await;

    let received = snapshots.drain();
    assert_eq!(received.len(), 2);
    assert_eq!(snapshots.dropped(), 3);

    shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_unusable_interval_spawns_nothing() {
    let config = MonitorConfig {
        collection_interval_seconds: u64::MAX,
        ..test_config()
    };
    let (snapshot_tx, mut snapshots) = event_stream::<MetricsSnapshot>("snapshot", 4);
    let (alert_tx, _alerts) = event_stream::<AlertEvent>("alert", 4);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let result = spawn_all_tasks(
        &config,
        MonitorShared::new(),
        None,
        snapshot_tx,
        alert_tx,
        &shutdown_tx,
    );
    assert!(matches!(result, Err(LogmonError::Config(_))));

    // The sender was dropped with the rejected call
    assert!(snapshots.recv().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_file_source_feeds_snapshots() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("access.log");
    std::fs::write(&path, lines("/report", 3).join("\n") + "\n").unwrap();

    let config = MonitorConfig {
        collection_interval_seconds: 1,
        ..test_config()
    };
    let shared = MonitorShared::new();
    let (snapshot_tx, mut snapshots) = event_stream::<MetricsSnapshot>("snapshot", 4);
    let (alert_tx, _alerts) = event_stream::<AlertEvent>("alert", 4);
    let (shutdown_tx, _) = broadcast::channel(1);

    let source = FileTailer::open(&path, false).unwrap();
    spawn_all_tasks(
        &config,
        shared.clone(),
        Some(Box::new(source)),
        snapshot_tx,
        alert_tx,
        &shutdown_tx,
    )
    .unwrap();

    let snapshot = timeout(Duration::from_secs(5), snapshots.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.total_hits, 3);
    assert_eq!(snapshot.top_sections[0].name, "/report");
    assert_eq!(shared.stats.parsed(), 3);

    shutdown_tx.send(()).unwrap();
}

#[test]
fn test_runtime_with_missing_file_still_starts() {
    let temp_dir = TempDir::new().unwrap();
    let config = MonitorConfig {
        log_source: temp_dir.path().join("missing.log"),
        ..Default::default()
    };

    let runtime = MonitorRuntime::new(&config).unwrap();
    assert!(runtime.source_name().contains("missing.log"));
    assert!(runtime.shared.stats.source_error().is_some());
    runtime.shutdown();
}

#[test]
fn test_runtime_rejects_invalid_config() {
    let config = MonitorConfig {
        alert_threshold: -3.0,
        ..Default::default()
    };
    assert!(MonitorRuntime::new(&config).is_err());
}

#[test]
fn test_runtime_with_custom_source() {
    let runtime =
        MonitorRuntime::with_source(&test_config(), ScriptedSource::new(vec![])).unwrap();
    assert_eq!(runtime.source_name(), "scripted");
    runtime.shutdown();
}
