//! Core data models for kgi-trader
//!
//! This module contains the plain data types shared by the session core and
//! the front ends: brokerage accounts, the account type filter, the trading
//! mode and the session identifier.

pub mod account;
pub mod filter;
pub mod ids;
pub mod mode;

pub use account::{Account, AccountKind};
pub use filter::AccountTypeFilter;
pub use ids::SessionId;
pub use mode::TradingMode;
