//! Layout definitions for the TUI
//!
//! Defines the overall layout structure: header, control panel, account
//! table, log panel and status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the TUI
pub struct AppLayout {
    /// Title line
    pub header: Rect,
    /// Login form, mode and account type selectors
    pub controls: Rect,
    /// Account table
    pub accounts: Rect,
    /// Session log
    pub log: Rect,
    /// Status bar at the bottom
    pub status_bar: Rect,
}

impl AppLayout {
    /// Calculate layout from available area
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),      // Header
                Constraint::Min(10),        // Body
                Constraint::Percentage(30), // Log
                Constraint::Length(1),      // Status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(38), // Controls (fixed width)
                Constraint::Min(40),    // Accounts
            ])
            .split(vertical[1]);

        Self {
            header: vertical[0],
            controls: body[0],
            accounts: body[1],
            log: vertical[2],
            status_bar: vertical[3],
        }
    }
}

/// Layout for the control panel
pub struct ControlsLayout {
    pub login: Rect,
    pub mode: Rect,
    pub filter: Rect,
}

impl ControlsLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // User id, password, button hint
                Constraint::Length(4), // Mode radio
                Constraint::Min(5),    // Filter radio
            ])
            .split(area);

        Self {
            login: chunks[0],
            mode: chunks[1],
            filter: chunks[2],
        }
    }
}

/// Create a fixed-size centered rect for dialogs
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
