//! Control panel
//!
//! Login form, trading mode radio and account type radio.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{AccountTypeFilter, TradingMode};
use crate::tui::app::{App, Focus};
use crate::tui::layout::ControlsLayout;

fn panel(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Cyan } else { Color::White };
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn radio<'a>(selected: bool, label: &'a str, accent: Color) -> Line<'a> {
    let (mark, style) = if selected {
        ("(•) ", Style::default().fg(accent).add_modifier(Modifier::BOLD))
    } else {
        ("( ) ", Style::default().fg(Color::Gray))
    };
    Line::from(vec![Span::styled(mark, style), Span::styled(label, style)])
}

/// Render the control panel
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = ControlsLayout::new(area);
    render_login(frame, app, layout.login);
    render_mode(frame, app, layout.mode);
    render_filter(frame, app, layout.filter);
}

fn render_login(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus.is_text();
    let block = panel("Login Credentials", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    app.user_id.focused = app.focus == Focus::UserId;
    app.password.focused = app.focus == Focus::Password;
    frame.render_widget(&app.user_id, rows[0]);
    frame.render_widget(&app.password, rows[1]);

    let hint = if app.busy().is_some() {
        Span::styled("Please wait...", Style::default().fg(Color::Yellow))
    } else if app.is_connected() {
        Span::styled("[F6] Logout", Style::default().fg(Color::Red))
    } else {
        Span::styled("[F5] Login", Style::default().fg(Color::Green))
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), rows[2]);
}

fn render_mode(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("Trading Mode", app.focus == Focus::Mode);
    let lines = vec![
        radio(
            app.mode == TradingMode::Simulation,
            "Simulation (safe testing)",
            Color::Green,
        ),
        radio(
            app.mode == TradingMode::Production,
            "Production (real trading)",
            Color::Red,
        ),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_filter(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("Account Type", app.focus == Focus::Filter);
    let counts = app.account_counts();

    let labels = [
        (AccountTypeFilter::All, format!("All accounts ({})", counts.total)),
        (
            AccountTypeFilter::EquitiesOnly,
            format!("Equities only ({})", counts.equities),
        ),
        (
            AccountTypeFilter::DerivativesOnly,
            format!("Derivatives only ({})", counts.derivatives),
        ),
    ];
    let lines: Vec<Line> = labels
        .iter()
        .map(|(filter, label)| radio(app.filter == *filter, label.as_str(), Color::Cyan))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
