//! Monitor command handler.
//!
//! Builds the effective configuration and runs the monitor with the
//! requested output.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use crate::core::config::MonitorConfig;
use crate::core::log_monitor::{AlertEvent, MetricsSnapshot, MonitorRuntime};
use crate::ui::monitor_tui::run_monitor_app;
use crate::ui::plain;

/// How often headless modes drain the event streams
const HEADLESS_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Tui,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        match matches.get_one::<String>("output").map(String::as_str) {
            Some("json") => OutputMode::Json,
            Some("plain") => OutputMode::Plain,
            _ => OutputMode::Tui,
        }
    }
}

/// One line of `--output json`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputEvent<'a> {
    Snapshot(&'a MetricsSnapshot),
    Alert(&'a AlertEvent),
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;

    match OutputMode::from_matches(matches) {
        OutputMode::Tui => run_monitor_app(&config).context("Failed to run log monitor"),
        mode => run_headless(&config, mode),
    }
}

/// Defaults, then the config file, then command-line flags.
pub fn build_config(matches: &ArgMatches) -> Result<MonitorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => MonitorConfig::load_from(path)?,
        None => MonitorConfig::load()?,
    };

    if let Some(path) = matches.get_one::<PathBuf>("log-filename") {
        config.log_source = path.clone();
    }
    if let Some(&threshold) = matches.get_one::<f64>("avg-threshold") {
        config.alert_threshold = threshold;
    }
    if let Some(&seconds) = matches.get_one::<u64>("collection-interval") {
        config.collection_interval_seconds = seconds;
    }
    if let Some(&seconds) = matches.get_one::<u64>("alert-interval") {
        config.alert_interval_seconds = seconds;
    }
    if matches.get_flag("from-start") {
        config.start_at_end = false;
    }

    config.validate().context("Invalid configuration")?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Print events to stdout until Ctrl+C
fn run_headless(config: &MonitorConfig, mode: OutputMode) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut runtime = MonitorRuntime::new(config)?;
    if let Some(error) = runtime.shared.stats.source_error() {
        eprintln!("Warning: {}", error);
    }

    while running.load(Ordering::SeqCst) {
        for snapshot in runtime.snapshots.drain() {
            match mode {
                OutputMode::Json => print_json(&OutputEvent::Snapshot(&snapshot))?,
                _ => println!(
                    "{}",
                    plain::format_snapshot(&snapshot, config.collection_interval_seconds)
                ),
            }
        }
        for alert in runtime.alerts.drain() {
            match mode {
                OutputMode::Json => print_json(&OutputEvent::Alert(&alert))?,
                _ => println!("{}", plain::format_alert(&alert)),
            }
        }

        std::thread::sleep(HEADLESS_POLL);
    }

    runtime.shutdown();
    Ok(())
}

fn print_json(event: &OutputEvent<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
