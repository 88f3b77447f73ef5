use anyhow::Result;
use std::path::PathBuf;

use logmon::commands::{self, OutputMode};

fn main() -> Result<()> {
    let matches = commands::build_cli().get_matches();

    // Keep log output off the dashboard
    let log_file = matches
        .get_one::<PathBuf>("log-file")
        .cloned()
        .or_else(|| match OutputMode::from_matches(&matches) {
            OutputMode::Tui => Some(std::env::temp_dir().join("logmon.log")),
            _ => None,
        });
    logmon::init_logging(log_file.as_deref());

    commands::monitor(&matches)
}
