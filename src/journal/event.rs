//! Session event data structures
//!
//! Every state transition of the session core is described by one
//! `SessionEvent`. The manager wraps it in a timestamped `JournalEntry`
//! before handing it to its sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Account, AccountKind, AccountTypeFilter, SessionId, TradingMode};

/// Severity of a session event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLevel::Info => write!(f, "INFO"),
            EventLevel::Warn => write!(f, "WARN"),
            EventLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Something that happened to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    LoginAttempt {
        owner_id: String,
        mode: TradingMode,
    },
    LoginSucceeded {
        owner_id: String,
        total: usize,
    },
    LoginFailed {
        owner_id: String,
        reason: String,
    },
    AccountDiscovered {
        index: usize,
        kind: AccountKind,
        owner_id: String,
        broker_id: String,
        account_id: String,
        signed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trader: Option<String>,
    },
    FilterApplied {
        filter: AccountTypeFilter,
        visible: usize,
    },
    SwitchRejected {
        filter: AccountTypeFilter,
        reason: String,
    },
    DefaultAccountSet {
        kind: AccountKind,
        account_id: String,
    },
    DefaultAccountRejected {
        account_id: String,
        reason: String,
    },
    LogoutSucceeded,
    LogoutRejected {
        reason: String,
    },
    TeardownError {
        reason: String,
    },
    ContractsStatusUnavailable {
        reason: String,
    },
    NotLoggedIn {
        operation: String,
    },
}

impl SessionEvent {
    /// Build the discovery event for the account at `index`
    pub fn discovered(index: usize, account: &Account) -> Self {
        Self::AccountDiscovered {
            index,
            kind: account.kind,
            owner_id: account.owner_id.clone(),
            broker_id: account.broker_id.clone(),
            account_id: account.account_id.clone(),
            signed: account.signed,
            trader: account.trader.clone(),
        }
    }

    /// Stable event name, matching the serialized tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginAttempt { .. } => "login_attempt",
            Self::LoginSucceeded { .. } => "login_succeeded",
            Self::LoginFailed { .. } => "login_failed",
            Self::AccountDiscovered { .. } => "account_discovered",
            Self::FilterApplied { .. } => "filter_applied",
            Self::SwitchRejected { .. } => "switch_rejected",
            Self::DefaultAccountSet { .. } => "default_account_set",
            Self::DefaultAccountRejected { .. } => "default_account_rejected",
            Self::LogoutSucceeded => "logout_succeeded",
            Self::LogoutRejected { .. } => "logout_rejected",
            Self::TeardownError { .. } => "teardown_error",
            Self::ContractsStatusUnavailable { .. } => "contracts_status_unavailable",
            Self::NotLoggedIn { .. } => "not_logged_in",
        }
    }

    pub fn level(&self) -> EventLevel {
        match self {
            Self::LoginFailed { .. } | Self::TeardownError { .. } => EventLevel::Error,
            Self::SwitchRejected { .. }
            | Self::DefaultAccountRejected { .. }
            | Self::LogoutRejected { .. }
            | Self::ContractsStatusUnavailable { .. }
            | Self::NotLoggedIn { .. } => EventLevel::Warn,
            _ => EventLevel::Info,
        }
    }

    /// One-line human-readable description
    pub fn message(&self) -> String {
        match self {
            Self::LoginAttempt { owner_id, mode } => {
                format!("Attempting {} login with user ID: {}", mode, owner_id)
            }
            Self::LoginSucceeded { total, .. } => {
                format!("Login successful. Found {} accounts.", total)
            }
            Self::LoginFailed { reason, .. } => format!("Login failed: {}", reason),
            Self::AccountDiscovered {
                index,
                kind,
                owner_id,
                broker_id,
                account_id,
                signed,
                trader,
            } => {
                let mut line = format!(
                    "Account {}: {} | person {} | broker {} | account {} | {}",
                    index + 1,
                    kind,
                    owner_id,
                    broker_id,
                    account_id,
                    if *signed { "Signed" } else { "Not Signed" }
                );
                if let Some(trader) = trader {
                    line.push_str(&format!(" | trader {}", trader));
                }
                line
            }
            Self::FilterApplied { filter, visible } => {
                format!("Showing {}: {} accounts", filter, visible)
            }
            Self::SwitchRejected { filter, reason } => {
                format!("Cannot switch to {}: {}", filter, reason)
            }
            Self::DefaultAccountSet { kind, account_id } => {
                format!("Set default {} account: {}", kind, account_id)
            }
            Self::DefaultAccountRejected { account_id, reason } => {
                format!("Cannot set default account {}: {}", account_id, reason)
            }
            Self::LogoutSucceeded => "Logout successful".to_string(),
            Self::LogoutRejected { reason } => format!("Logout rejected: {}", reason),
            Self::TeardownError { reason } => {
                format!("Error while closing brokerage session: {}", reason)
            }
            Self::ContractsStatusUnavailable { reason } => {
                format!("Contracts status unavailable: {}", reason)
            }
            Self::NotLoggedIn { operation } => format!("Not logged in ({})", operation),
        }
    }
}

/// A timestamped session event, as written to the journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Session the event belongs to, if one was active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    #[serde(flatten)]
    pub event: SessionEvent,
}

impl JournalEntry {
    pub fn new(session_id: Option<SessionId>, event: SessionEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            event,
        }
    }

    pub fn level(&self) -> EventLevel {
        self.event.level()
    }

    /// Render as a log-panel line, e.g. `12:00:01 [INFO] Logout successful`
    pub fn render_line(&self) -> String {
        format!(
            "{} [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level(),
            self.event.message()
        )
    }
}
