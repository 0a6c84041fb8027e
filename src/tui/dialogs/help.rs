//! Help dialog
//!
//! Lists keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::layout::centered_rect_fixed;

/// Render the help dialog
pub fn render(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        heading("Global Keys"),
        key_line("Tab", "Next control"),
        key_line("Shift+Tab", "Previous control"),
        key_line("F5 / l", "Login"),
        key_line("F6 / o", "Logout"),
        key_line("1 / 2 / 3", "All / Equities / Derivatives"),
        key_line("x", "Clear log"),
        key_line("q / Esc", "Quit"),
        key_line("F1 / ?", "This help"),
        Line::from(""),
        heading("Login Form"),
        key_line("Enter", "Next field, then login"),
        Line::from(""),
        heading("Mode and Account Type"),
        key_line("Space", "Change selection"),
        Line::from(""),
        heading("Account Table"),
        key_line("j/k", "Move selection"),
        key_line("d / Enter", "Set as default account"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Green)),
        Span::raw(description),
    ])
}
