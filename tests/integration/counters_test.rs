use std::sync::Arc;
use std::thread;

use logmon::core::log_monitor::{ingest_line, take_snapshot, CounterStore, IngestStats};

fn line(path: &str, status: u16, bytes: u64) -> String {
    format!(
        r#"127.0.0.1 - frank [09/May/2018:16:00:42 +0000] "GET {} HTTP/1.0" {} {}"#,
        path, status, bytes
    )
}

#[test]
fn test_snapshot_after_ingest() {
    let store = CounterStore::new();
    let stats = IngestStats::new();

    for _ in 0..3 {
        ingest_line(&store, &stats, &line("/api/user", 200, 100)).unwrap();
    }
    ingest_line(&store, &stats, &line("/report", 500, 10)).unwrap();
    ingest_line(&store, &stats, &line("/", 200, 1)).unwrap();
    assert!(ingest_line(&store, &stats, "not an access log line").is_err());

    let snapshot = take_snapshot(&store);
    assert_eq!(snapshot.total_hits, 5);
    assert_eq!(snapshot.total_bytes, 311);
    assert_eq!(snapshot.top_sections[0].name, "/api");
    assert_eq!(snapshot.top_sections[0].hits, 3);
    assert_eq!(snapshot.return_codes.get(&200), Some(&4));
    assert_eq!(snapshot.return_codes.get(&500), Some(&1));
    assert_eq!(stats.parsed(), 5);
    assert_eq!(stats.skipped(), 1);
}

#[test]
fn test_sections_sum_to_total() {
    let store = CounterStore::new();
    let stats = IngestStats::new();

    for (i, section) in ["/a", "/b", "/c"].iter().enumerate() {
        for _ in 0..=i {
            ingest_line(&store, &stats, &line(section, 200, 5)).unwrap();
        }
    }

    let snapshot = take_snapshot(&store);
    let sum: u64 = snapshot.top_sections.iter().map(|s| s.hits).sum();
    assert_eq!(sum, snapshot.total_hits);
    assert_eq!(snapshot.total_hits, 6);
}

#[test]
fn test_deltas_between_snapshots() {
    let store = CounterStore::new();
    let stats = IngestStats::new();

    ingest_line(&store, &stats, &line("/pages", 200, 10)).unwrap();
    let first = take_snapshot(&store);
    assert_eq!(first.total_hits, 1);

    let idle = take_snapshot(&store);
    assert_eq!(idle.total_hits, 0);
    assert_eq!(idle.total_bytes, 0);
    assert!(idle.top_sections.iter().all(|s| s.hits == 0));

    ingest_line(&store, &stats, &line("/pages", 200, 10)).unwrap();
    ingest_line(&store, &stats, &line("/pages", 200, 10)).unwrap();
    let third = take_snapshot(&store);
    assert_eq!(third.total_hits, 2);
    assert_eq!(third.total_bytes, 20);

    // Cumulative counters are never reset
    assert_eq!(store.hits.get("/pages"), Some(3));
}

#[test]
fn test_concurrent_ingest_with_snapshots() {
    let store = Arc::new(CounterStore::new());
    let stats = Arc::new(IngestStats::new());

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                let path = format!("/s{}/x", i);
                for _ in 0..500 {
                    ingest_line(&store, &stats, &line(&path, 200, 2)).unwrap();
                }
            })
        })
        .collect();

    // Snapshots interleaved with writers must add up to the final total
    let mut seen = 0;
    for _ in 0..10 {
        seen += take_snapshot(&store).total_hits;
    }
    for writer in writers {
        writer.join().unwrap();
    }
    seen += take_snapshot(&store).total_hits;

    assert_eq!(seen, 2000);
    assert_eq!(store.hits.total(), 2000);
    assert_eq!(store.bytes.total(), 4000);
}
