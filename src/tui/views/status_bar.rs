//! Status bar view
//!
//! Shows trading mode, connection status, account counts and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::models::TradingMode;
use crate::tui::app::App;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![];

    let mode_color = match app.mode {
        TradingMode::Simulation => Color::Green,
        TradingMode::Production => Color::Red,
    };
    spans.push(Span::styled(
        format!(" {} ", app.mode),
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::raw(" "));
    let status_color = if app.busy().is_some() {
        Color::Yellow
    } else if app.is_connected() {
        Color::Green
    } else if app.status.contains("failed") || app.status.starts_with("Please") {
        Color::Red
    } else {
        Color::White
    };
    spans.push(Span::styled(
        app.status.as_str(),
        Style::default().fg(status_color),
    ));

    if app.is_connected() {
        let counts = app.account_counts();
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("EQ {}  FO {}", counts.equities, counts.derivatives),
            Style::default().fg(Color::Cyan),
        ));
    }

    let hints = " F1:Help  F5:Login  F6:Logout  q:Quit ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(left_len)
        .saturating_sub(hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
