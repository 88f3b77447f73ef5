use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::MonitorConfig;
use crate::core::log_monitor::{
    AlertEvent, IngestStats, MetricsSnapshot, MonitorRuntime, TrafficHistory,
};

use super::event_handler::MonitorEvent;
use super::render::render_ui;

/// Alerts kept on screen
const MAX_ALERT_HISTORY: usize = 100;

/// Number of panels Tab cycles through (sections, status codes, alerts)
pub const PANEL_COUNT: usize = 3;

/// How long to wait for a key before refreshing the screen
const UI_REFRESH: Duration = Duration::from_millis(250);

/// Everything the dashboard draws, fed from the two event streams
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub source_name: String,
    pub alert_threshold: f64,
    pub collection_interval_secs: u64,
    pub alert_interval_secs: u64,
    pub latest: MetricsSnapshot,
    pub history: TrafficHistory,
    /// Newest first
    pub alerts: VecDeque<AlertEvent>,
    pub alert_active: bool,
    pub snapshots_received: u64,
    pub parsed_lines: u64,
    pub skipped_lines: u64,
    pub dropped_events: u64,
    pub source_error: Option<String>,
    pub should_quit: bool,
    pub show_help: bool,
    pub selected_panel: usize,
    pub alert_scroll: usize,
}

impl DashboardState {
    pub fn new(config: &MonitorConfig, source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            alert_threshold: config.alert_threshold,
            collection_interval_secs: config.collection_interval_seconds,
            alert_interval_secs: config.alert_interval_seconds,
            latest: MetricsSnapshot::default(),
            history: TrafficHistory::new(),
            alerts: VecDeque::new(),
            alert_active: false,
            snapshots_received: 0,
            parsed_lines: 0,
            skipped_lines: 0,
            dropped_events: 0,
            source_error: None,
            should_quit: false,
            show_help: false,
            selected_panel: 0,
            alert_scroll: 0,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: MetricsSnapshot) {
        self.history.push(&snapshot);
        self.latest = snapshot;
        self.snapshots_received += 1;
    }

    pub fn apply_alert(&mut self, event: AlertEvent) {
        self.alert_active = event.is_triggered();
        self.alerts.push_front(event);
        self.alerts.truncate(MAX_ALERT_HISTORY);
        self.alert_scroll = 0;
    }

    pub fn apply_stats(&mut self, stats: &IngestStats, dropped_events: u64) {
        self.parsed_lines = stats.parsed();
        self.skipped_lines = stats.skipped();
        self.source_error = stats.source_error();
        self.dropped_events = dropped_events;
    }

    /// Hits per second in the latest collection window
    pub fn current_rate(&self) -> f64 {
        if self.collection_interval_secs == 0 {
            return 0.0;
        }
        self.latest.total_hits as f64 / self.collection_interval_secs as f64
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        if self.show_help && event != MonitorEvent::None {
            // Any key closes the help overlay
            self.show_help = false;
            if event != MonitorEvent::Quit {
                return;
            }
        }

        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::NextPanel => {
                self.selected_panel = (self.selected_panel + 1) % PANEL_COUNT
            }
            MonitorEvent::PrevPanel => {
                self.selected_panel = if self.selected_panel == 0 {
                    PANEL_COUNT - 1
                } else {
                    self.selected_panel - 1
                };
            }
            MonitorEvent::ScrollUp => {
                self.alert_scroll = self.alert_scroll.saturating_sub(1);
            }
            MonitorEvent::ScrollDown => {
                let max_scroll = self.alerts.len().saturating_sub(1);
                if self.alert_scroll < max_scroll {
                    self.alert_scroll += 1;
                }
            }
            MonitorEvent::ClearAlerts => {
                self.alerts.clear();
                self.alert_scroll = 0;
            }
            MonitorEvent::None => {}
        }
    }
}

/// Monitor application: the runtime plus what is on screen
pub struct MonitorApp {
    pub runtime: MonitorRuntime,
    pub state: DashboardState,
}

impl MonitorApp {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let runtime = MonitorRuntime::new(config).context("Failed to start monitor runtime")?;
        let state = DashboardState::new(config, runtime.source_name());
        Ok(Self { runtime, state })
    }

    /// Pull everything that arrived on the event streams
    pub fn update(&mut self) {
        for snapshot in self.runtime.snapshots.drain() {
            self.state.apply_snapshot(snapshot);
        }
        for alert in self.runtime.alerts.drain() {
            self.state.apply_alert(alert);
        }

        let dropped = self.runtime.snapshots.dropped() + self.runtime.alerts.dropped();
        self.state.apply_stats(&self.runtime.shared.stats, dropped);
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: &MonitorConfig) -> Result<()> {
    let mut app = MonitorApp::new(config)?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    app.runtime.shutdown();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
) -> Result<()> {
    loop {
        app.update();
        terminal.draw(|frame| render_ui(frame, &app.state))?;

        if event::poll(UI_REFRESH).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.state.handle_event(MonitorEvent::from_key(key.code));
                }
            }
        }

        if app.state.should_quit {
            return Ok(());
        }
    }
}
