//! Event handler for the TUI
//!
//! Routes keyboard events to the appropriate handlers based on the current
//! application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::{AccountTypeFilter, TradingMode};

use super::app::{ActiveDialog, App, Confirmation, Focus};
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => app.poll(),
        Event::Resize(_, _) => {}
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return;
    }

    // Keys that work regardless of focus
    match key.code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.previous();
            return;
        }
        KeyCode::F(1) => {
            app.open_dialog(ActiveDialog::Help);
            return;
        }
        KeyCode::F(5) => {
            app.start_login();
            return;
        }
        KeyCode::F(6) => {
            app.start_logout();
            return;
        }
        KeyCode::Esc => {
            app.request_quit();
            return;
        }
        _ => {}
    }

    if app.focus.is_text() {
        handle_text_key(app, key);
    } else {
        handle_normal_key(app, key);
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    let dialog = app.active_dialog;
    match dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::Confirm(confirmation) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.close_dialog();
                match confirmation {
                    Confirmation::ProductionMode => app.apply_mode(TradingMode::Production),
                    Confirmation::Quit => app.confirm_quit(),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::None => {}
    }
}

fn handle_text_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter if app.focus == Focus::UserId => {
            app.focus = Focus::Password;
            return;
        }
        KeyCode::Enter => {
            app.start_login();
            return;
        }
        KeyCode::Down => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::Up => {
            app.focus = app.focus.previous();
            return;
        }
        _ => {}
    }

    let input = match app.focus {
        Focus::UserId => &mut app.user_id,
        _ => &mut app.password,
    };
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.request_quit();
            return;
        }
        KeyCode::Char('?') => {
            app.open_dialog(ActiveDialog::Help);
            return;
        }
        KeyCode::Char('l') => {
            app.start_login();
            return;
        }
        KeyCode::Char('o') => {
            app.start_logout();
            return;
        }
        KeyCode::Char('x') => {
            app.clear_log();
            return;
        }
        KeyCode::Char('1') => {
            app.select_filter(AccountTypeFilter::All);
            return;
        }
        KeyCode::Char('2') => {
            app.select_filter(AccountTypeFilter::EquitiesOnly);
            return;
        }
        KeyCode::Char('3') => {
            app.select_filter(AccountTypeFilter::DerivativesOnly);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Mode => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                app.toggle_mode()
            }
            _ => {}
        },
        Focus::Filter => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Down => {
                let next = app.filter.next();
                app.select_filter(next);
            }
            _ => {}
        },
        Focus::Accounts => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.select_next_account(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous_account(),
            KeyCode::Char('d') | KeyCode::Enter => app.set_selected_default(),
            _ => {}
        },
        Focus::UserId | Focus::Password => {}
    }
}
