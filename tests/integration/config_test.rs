use logmon::core::config::MonitorConfig;
use logmon::LogmonError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = MonitorConfig::default();
    assert_eq!(config.log_source, PathBuf::from("/tmp/access.log"));
    assert_eq!(config.collection_interval(), Duration::from_secs(10));
    assert_eq!(config.alert_interval(), Duration::from_secs(120));
    assert!(config.start_at_end);
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "log_source": "/var/log/nginx/access.log",
            "collection_interval_seconds": 5,
            "alert_threshold": 2.5,
            "some_future_field": true
        }"#,
    )
    .unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.log_source, PathBuf::from("/var/log/nginx/access.log"));
    assert_eq!(config.collection_interval_seconds, 5);
    assert_eq!(config.alert_threshold, 2.5);
    // Missing fields keep their defaults
    assert_eq!(config.alert_interval_seconds, 120);
    assert_eq!(config.poll_interval_ms, 250);
}

#[test]
fn test_config_file_values_checked_by_validate() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"alert_interval_seconds": 0}"#).unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("alert_interval_seconds"));
}

#[test]
fn test_interval_longer_than_a_day_rejected() {
    let config = MonitorConfig {
        collection_interval_seconds: u64::MAX,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(LogmonError::Config(_))));
}

#[test]
fn test_config_load_rejects_bad_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(MonitorConfig::load_from(&path).is_err());
}

#[test]
fn test_config_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(MonitorConfig::load_from(&temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_validate_zero_capacity() {
    let config = MonitorConfig {
        event_queue_capacity: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(LogmonError::Config(_))));
}

#[test]
fn test_config_path_location() {
    if let Some(path) = MonitorConfig::get_config_path() {
        assert!(path.ends_with("logmon/config.json"));
    }
}
