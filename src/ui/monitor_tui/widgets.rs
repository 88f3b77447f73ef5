use ratatui::prelude::*;

/// Color for an HTTP status code class
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::LightYellow,
        500..=599 => Color::LightRed,
        _ => Color::Gray,
    }
}

/// Color for the current rate relative to the alert threshold
pub fn rate_color(rate: f64, threshold: f64) -> Color {
    if threshold <= 0.0 || rate >= threshold {
        Color::Red
    } else if rate >= threshold * 0.75 {
        Color::LightYellow
    } else {
        Color::Cyan
    }
}

/// Border style, highlighted when the panel is selected
pub fn panel_border(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}
