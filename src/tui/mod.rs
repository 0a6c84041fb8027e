//! Terminal User Interface module
//!
//! A ratatui front end over one `SessionManager`: login form, trading mode and
//! account type selectors, the account table and a live session log.
//! Blocking brokerage calls run on a worker thread (see `worker`).

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;
pub mod worker;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
