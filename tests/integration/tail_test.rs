use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use logmon::core::log_monitor::{
    ingest_line, take_snapshot, CounterStore, FileTailer, IngestStats, LineSource,
};
use tempfile::TempDir;

const SAMPLE: &str = r#"127.0.0.1 - james [09/May/2018:16:00:39 +0000] "GET /report HTTP/1.0" 200 123
127.0.0.1 - jill [09/May/2018:16:00:41 +0000] "GET /api/user HTTP/1.0" 200 234
127.0.0.1 - frank [09/May/2018:16:00:42 +0000] "POST /api/user HTTP/1.0" 200 34
127.0.0.1 - mary [09/May/2018:16:00:42 +0000] "POST /api/user HTTP/1.0" 503 12
"#;

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new().append(true).create(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

fn drain_into(tailer: &mut FileTailer, store: &CounterStore, stats: &IngestStats) {
    for line in tailer.poll_lines().unwrap() {
        let _ = ingest_line(store, stats, &line);
    }
}

#[test]
fn test_tailed_file_reaches_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("access.log");
    append(&path, "");

    let store = CounterStore::new();
    let stats = IngestStats::new();
    let mut tailer = FileTailer::open(&path, true).unwrap();

    append(&path, SAMPLE);
    append(&path, "this is not a log line\n");
    drain_into(&mut tailer, &store, &stats);

    let snapshot = take_snapshot(&store);
    assert_eq!(snapshot.total_hits, 4);
    assert_eq!(snapshot.total_bytes, 403);
    assert_eq!(snapshot.top_sections[0].name, "/api");
    assert_eq!(snapshot.top_sections[0].hits, 3);
    assert_eq!(snapshot.top_sections[1].name, "/report");
    assert_eq!(snapshot.return_codes.get(&503), Some(&1));
    assert_eq!(stats.parsed(), 4);
    assert_eq!(stats.skipped(), 1);
}

#[test]
fn test_existing_content_ignored_unless_from_start() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("access.log");
    append(&path, SAMPLE);

    let store = CounterStore::new();
    let stats = IngestStats::new();
    let mut at_end = FileTailer::open(&path, true).unwrap();
    drain_into(&mut at_end, &store, &stats);
    assert_eq!(take_snapshot(&store).total_hits, 0);

    let mut from_start = FileTailer::open(&path, false).unwrap();
    drain_into(&mut from_start, &store, &stats);
    assert_eq!(take_snapshot(&store).total_hits, 4);
}

#[cfg(unix)]
#[test]
fn test_counts_survive_rotation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("access.log");
    append(&path, "");

    let store = CounterStore::new();
    let stats = IngestStats::new();
    let mut tailer = FileTailer::open(&path, true).unwrap();

    append(&path, SAMPLE);
    // logrotate-style: move the file away, then create a fresh one
    fs::rename(&path, temp_dir.path().join("access.log.1")).unwrap();
    append(&path, SAMPLE);
    drain_into(&mut tailer, &store, &stats);

    assert_eq!(take_snapshot(&store).total_hits, 8);
    assert_eq!(tailer.describe(), path.display().to_string());
}
