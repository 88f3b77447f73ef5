use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Sparkline, Table},
};

use super::app::DashboardState;
use super::widgets::{panel_border, rate_color, status_color};
use crate::core::log_monitor::TOP_SECTIONS;
use crate::ui::formatters::{format_rate, format_size, format_time};

const PANEL_SECTIONS: usize = 0;
const PANEL_STATUS: usize = 1;
const PANEL_ALERTS: usize = 2;

/// Main render function
pub fn render_ui(frame: &mut Frame, state: &DashboardState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Percentage(40), // Traffic sparklines + top sections
            Constraint::Percentage(25), // Status codes
            Constraint::Min(5),         // Alerts
            Constraint::Length(1),      // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], state);

    let traffic_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_traffic(frame, traffic_chunks[0], state);
    render_top_sections(frame, traffic_chunks[1], state);

    render_status_codes(frame, chunks[2], state);
    render_alerts(frame, chunks[3], state);
    render_footer(frame, chunks[4], state);

    // Render help overlay if active
    if state.show_help {
        render_help_overlay(frame, area);
    }
}

/// Header with source, thresholds and alert status
fn render_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let (status, status_color) = if state.alert_active {
        ("⚠ HIGH TRAFFIC", Color::Red)
    } else {
        ("OK", Color::Green)
    };

    let title = format!(
        " HTTP log monitor │ {} │ window {}s │ alert {:.2} hits/s over {}s ",
        state.source_name,
        state.collection_interval_secs,
        state.alert_threshold,
        state.alert_interval_secs
    );

    let line = Line::from(vec![
        Span::raw(" Status: "),
        Span::styled(
            status,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ Last snapshot: {}",
            if state.snapshots_received == 0 {
                "waiting...".to_string()
            } else {
                format_time(state.latest.timestamp)
            }
        )),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(status_color));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Sparklines for total hits and bytes per window
fn render_traffic(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(format!(
            " General Metrics - {} seconds aggregation ",
            state.collection_interval_secs
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    // Only the most recent points that fit on screen
    let width = inner.width as usize;
    let recent = |data: Vec<u64>| -> Vec<u64> {
        let start = data.len().saturating_sub(width);
        data[start..].to_vec()
    };

    let rate = state.current_rate();
    let hits = Sparkline::default()
        .block(Block::default().title(format!(
            "Total Hits: {} ({})",
            state.latest.total_hits,
            format_rate(state.latest.total_hits, state.collection_interval_secs)
        )))
        .style(Style::default().fg(rate_color(rate, state.alert_threshold)))
        .data(recent(state.history.hits_as_vec()));
    frame.render_widget(hits, rows[0]);

    let bytes = Sparkline::default()
        .block(Block::default().title(format!(
            "Total Bytes: {}",
            format_size(state.latest.total_bytes)
        )))
        .style(Style::default().fg(Color::Red))
        .data(recent(state.history.bytes_as_vec()));
    frame.render_widget(bytes, rows[1]);
}

fn render_top_sections(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(format!(" Top {} Section Hits ", TOP_SECTIONS))
        .borders(Borders::ALL)
        .border_style(panel_border(state.selected_panel == PANEL_SECTIONS));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.latest.top_sections.is_empty() {
        let no_data = Paragraph::new("No traffic yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(no_data, inner);
        return;
    }

    let header = Row::new(vec!["Section", "Hits", "Share"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let total = state.latest.total_hits;
    let rows: Vec<Row> = state
        .latest
        .top_sections
        .iter()
        .map(|section| {
            let share = if total > 0 {
                section.hits as f64 * 100.0 / total as f64
            } else {
                0.0
            };
            Row::new(vec![
                Cell::from(section.name.clone()),
                Cell::from(section.hits.to_string()),
                Cell::from(format!("{:>5.1}%", share)),
            ])
            .style(Style::default().fg(Color::Yellow))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(55),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_status_codes(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" Return Codes ")
        .borders(Borders::ALL)
        .border_style(panel_border(state.selected_panel == PANEL_STATUS));

    let codes: Vec<(u16, u64)> = state
        .latest
        .return_codes
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&code, &count)| (code, count))
        .collect();

    if codes.is_empty() {
        let no_data = Paragraph::new("No responses in the last window")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(no_data, area);
        return;
    }

    let labels: Vec<String> = codes.iter().map(|(code, _)| code.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(codes.iter())
        .map(|(label, (_, count))| (label.as_str(), *count))
        .collect();

    // Bars take the colour of the worst status present
    let worst = codes.iter().map(|(code, _)| *code).max().unwrap_or(200);

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Vertical)
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(status_color(worst)))
        .value_style(Style::default().fg(Color::Black).bg(status_color(worst)))
        .data(&data);

    frame.render_widget(chart, area);
}

fn render_alerts(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let border = if state.alert_active {
        Style::default().fg(Color::Red)
    } else {
        panel_border(state.selected_panel == PANEL_ALERTS)
    };

    let block = Block::default()
        .title(format!(" Alerts ({}) ", state.alerts.len()))
        .borders(Borders::ALL)
        .border_style(border);

    if state.alerts.is_empty() {
        let no_data = Paragraph::new("No alerts")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(no_data, area);
        return;
    }

    let items: Vec<ListItem> = state
        .alerts
        .iter()
        .skip(state.alert_scroll)
        .map(|alert| {
            let (icon, color) = if alert.is_triggered() {
                ("🔴", Color::Red)
            } else {
                ("🟢", Color::Green)
            };
            ListItem::new(format!("{} {}", icon, alert)).style(Style::default().fg(color))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = vec![Span::styled(
        format!(
            " q: Quit │ ?: Help │ Tab: Switch panel │ ↑↓: Scroll alerts │ c: Clear │ parsed {} │ skipped {} │ dropped events {} ",
            state.parsed_lines, state.skipped_lines, state.dropped_events
        ),
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(ref error) = state.source_error {
        spans.push(Span::styled(
            format!("│ source error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    HTTP Log Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    Tab         Next panel
    Shift+Tab   Previous panel
    ↑ / k       Scroll alerts up
    ↓ / j       Scroll alerts down
    c           Clear alert history

    Press any key to close this help
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    // Center the help popup
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
