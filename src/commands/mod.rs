// Command handlers module
pub mod monitor;

use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::core::config::MAX_INTERVAL_SECS;

// Re-exports for cleaner imports
pub use monitor::execute as monitor;
pub use monitor::OutputMode;

/// Command-line definition for the `logmon` binary
pub fn build_cli() -> Command {
    Command::new("logmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Follows an HTTP access log and reports traffic statistics and alerts")
        .arg(
            Arg::new("log-filename")
                .long("log-filename")
                .value_name("PATH")
                .help("Access log to monitor [default: /tmp/access.log]")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("avg-threshold")
                .long("avg-threshold")
                .value_name("HITS_PER_SEC")
                .help("Average hits per second over the alert window that raises an alert [default: 10]")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("collection-interval")
                .long("collection-interval")
                .value_name("SECONDS")
                .help("Seconds between two traffic snapshots [default: 10]")
                .value_parser(clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS)),
        )
        .arg(
            Arg::new("alert-interval")
                .long("alert-interval")
                .value_name("SECONDS")
                .help("Seconds between two alert evaluations [default: 120]")
                .value_parser(clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON config file (overrides the one in the user config directory)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("MODE")
                .help("Where events go: interactive dashboard, JSON lines or plain text")
                .value_parser(["tui", "json", "plain"])
                .default_value("tui"),
        )
        .arg(
            Arg::new("from-start")
                .long("from-start")
                .help("Count the lines already in the file instead of only new ones")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write diagnostics to this file [default in tui mode: <temp dir>/logmon.log]")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}
