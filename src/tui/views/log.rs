//! Session log panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::App;

fn line_style(line: &str) -> Style {
    if line.contains("[ERROR]") {
        Style::default().fg(Color::Red)
    } else if line.contains("[WARN]") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Render the most recent log lines that fit
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Information ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let height = block.inner(area).height as usize;
    let skip = app.log.len().saturating_sub(height);
    let lines: Vec<Line> = app
        .log
        .iter()
        .skip(skip)
        .map(|l| Line::styled(l.as_str(), line_style(l)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
