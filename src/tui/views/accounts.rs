//! Account table
//!
//! Every account of the session; rows outside the current filter are dimmed
//! and the default account of each kind is starred.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::tui::app::{App, Focus};

/// Render the account table
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Accounts;
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::White
    };

    let block = Block::default()
        .title(format!(" Accounts: {} ", app.filter))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let details = app.account_details();
    if details.is_empty() {
        let text = if app.busy().is_some() {
            "Waiting for the brokerage..."
        } else {
            "Not logged in."
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let widths = [
        Constraint::Length(3),  // Default marker
        Constraint::Length(12), // Type
        Constraint::Length(8),  // Broker
        Constraint::Length(12), // Account
        Constraint::Length(12), // Person
        Constraint::Length(11), // Signed
        Constraint::Min(6),     // Trader
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Type").style(bold),
        Cell::from("Broker").style(bold),
        Cell::from("Account").style(bold),
        Cell::from("Person").style(bold),
        Cell::from("Status").style(bold),
        Cell::from("Trader").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = details
        .iter()
        .map(|d| {
            let row_style = if d.visible {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let signed_style = if !d.visible {
                row_style
            } else if d.signed {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };

            Row::new(vec![
                Cell::from(if d.is_default { " *" } else { "" }),
                Cell::from(d.kind.to_string()),
                Cell::from(d.broker_id.clone()),
                Cell::from(d.account_id.clone()),
                Cell::from(d.owner_id.clone()),
                Cell::from(if d.signed { "Signed" } else { "Not Signed" }).style(signed_style),
                Cell::from(d.trader.clone().unwrap_or_default()),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if is_focused {
        state.select(Some(app.selected_account));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
