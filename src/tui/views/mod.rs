//! TUI Views module
//!
//! Contains the control panel, account table, log panel and status bar.

pub mod accounts;
pub mod controls;
pub mod log;
pub mod status_bar;

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    let title = Paragraph::new("KGI Securities Trading Application")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(title, layout.header);

    controls::render(frame, app, layout.controls);
    accounts::render(frame, app, layout.accounts);
    log::render(frame, app, layout.log);
    status_bar::render(frame, app, layout.status_bar);

    match app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::Confirm(confirmation) => dialogs::confirm::render(frame, confirmation),
        ActiveDialog::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{AccountTypeFilter, TradingMode};
    use crate::tui::app::Confirmation;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        App::new(
            Settings::default(),
            None,
            TradingMode::Simulation,
            AccountTypeFilter::All,
            Some("A123".into()),
        )
    }

    #[test]
    fn test_render_logged_out() {
        let mut app = app();
        app.password.insert('p');
        let screen = screen(&mut app);

        assert!(screen.contains("KGI Securities Trading Application"));
        assert!(screen.contains("A123"));
        assert!(screen.contains("Password: *"));
        assert!(!screen.contains("Password: p"));
        assert!(screen.contains("Not logged in."));
        assert!(screen.contains("SIMULATION"));
        assert!(screen.contains("Client initialized"));
    }

    #[test]
    fn test_render_confirm_dialog() {
        let mut app = app();
        app.open_dialog(ActiveDialog::Confirm(Confirmation::ProductionMode));
        let screen = screen(&mut app);
        assert!(screen.contains("Confirm"));
        assert!(screen.contains("[Y]"));
    }
}
