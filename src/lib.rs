//! kgi-trader - Session and account management for a KGI brokerage client
//!
//! This library wraps a vendor brokerage SDK behind a small session core: it
//! logs a user in, classifies the returned accounts as Equities or
//! Derivatives, keeps a default account per kind and lets front ends switch
//! which account type is visible without logging in again.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Accounts, the account type filter, trading mode, ids
//! - `broker`: The SDK boundary, with bridge and fixture implementations
//! - `journal`: Session events and their sinks
//! - `session`: The `SessionManager` and its state
//! - `display`: Terminal formatting for the CLI
//! - `cli`: Line-oriented commands and the interactive menu
//! - `tui`: The ratatui front end
//!
//! # Example
//!
//! ```rust,ignore
//! use kgi_trader::broker::FixtureConnector;
//! use kgi_trader::journal::TracingSink;
//! use kgi_trader::models::{AccountTypeFilter, TradingMode};
//! use kgi_trader::session::SessionManager;
//!
//! let connector = FixtureConnector::new("roster.json".into());
//! let mut manager = SessionManager::new(
//!     TradingMode::Simulation,
//!     Box::new(connector),
//!     Box::new(TracingSink),
//! );
//! if manager.login("A123456789", "secret", AccountTypeFilter::All) {
//!     for account in manager.list_visible_accounts() {
//!         println!("{}", account);
//!     }
//!     manager.logout();
//! }
//! ```

pub mod broker;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod journal;
pub mod models;
pub mod session;
pub mod tui;

pub use error::{TraderError, TraderResult};
pub use session::SessionManager;
