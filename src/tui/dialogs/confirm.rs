//! Confirmation dialog
//!
//! Simple yes/no confirmation

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::Confirmation;
use crate::tui::layout::centered_rect_fixed;

/// Render a confirmation dialog
pub fn render(frame: &mut Frame, confirmation: Confirmation) {
    let area = centered_rect_fixed(56, 8, frame.area());

    frame.render_widget(Clear, area);

    let accent = match confirmation {
        Confirmation::ProductionMode => Color::Red,
        Confirmation::Quit => Color::Yellow,
    };

    let block = Block::default()
        .title(" Confirm ")
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            confirmation.message(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(Color::Green)),
            Span::raw(" Yes  "),
            Span::styled("[N]", Style::default().fg(Color::Red)),
            Span::raw(" No  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
