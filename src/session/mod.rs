//! Session core
//!
//! `SessionManager` is the only stateful component of the crate. It owns the
//! SDK handle, the account snapshot taken at login, the current account type
//! filter and the per-kind default accounts.

mod manager;
mod report;
mod state;

pub use manager::{SessionManager, NOT_LOGGED_IN};
pub use report::{AccountDetail, AccountTypeCounts, SessionStatus};
pub use state::{compute_defaults, filter_indices, Defaults, SessionState, SwitchRejection};
