//! Display formatting for terminal output
//!
//! Provides utilities for formatting session data for the line-oriented
//! front end.

pub mod account;
pub mod status;

pub use account::{format_account_details, format_visible_accounts};
pub use status::{format_counts, format_journal, format_session_status};
