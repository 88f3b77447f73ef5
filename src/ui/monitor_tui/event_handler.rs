use crossterm::event::KeyCode;

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Highlight the next panel
    NextPanel,
    /// Highlight the previous panel
    PrevPanel,
    /// Scroll the alert history up
    ScrollUp,
    /// Scroll the alert history down
    ScrollDown,
    /// Forget the alert history
    ClearAlerts,
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Tab => MonitorEvent::NextPanel,
            KeyCode::BackTab => MonitorEvent::PrevPanel,
            KeyCode::Up | KeyCode::Char('k') => MonitorEvent::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => MonitorEvent::ScrollDown,
            KeyCode::Char('c') => MonitorEvent::ClearAlerts,
            _ => MonitorEvent::None,
        }
    }
}
