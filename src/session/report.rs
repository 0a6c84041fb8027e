//! Read-only reports produced by the session manager

use serde::Serialize;

use crate::models::{AccountKind, AccountTypeFilter, SessionId, TradingMode};

/// Account counts over the full login snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountTypeCounts {
    pub equities: usize,
    pub derivatives: usize,
    pub total: usize,
}

impl AccountTypeCounts {
    pub fn of(&self, kind: AccountKind) -> usize {
        match kind {
            AccountKind::Equities => self.equities,
            AccountKind::Derivatives => self.derivatives,
        }
    }
}

/// One account from the login snapshot, with its place in the current view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetail {
    /// 1-based position in login order
    pub index: usize,
    pub kind: AccountKind,
    pub owner_id: String,
    pub broker_id: String,
    pub account_id: String,
    pub signed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trader: Option<String>,
    /// Passes the current account type filter
    pub visible: bool,
    /// Current default for its kind
    pub is_default: bool,
}

/// Aggregate session status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub mode: TradingMode,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub filter: AccountTypeFilter,
    pub visible_count: usize,
    pub counts: AccountTypeCounts,
    pub has_default_equities: bool,
    pub has_default_derivatives: bool,
    /// Passed through from the SDK without interpretation
    pub contracts_status: String,
}

impl SessionStatus {
    pub fn total_count(&self) -> usize {
        self.counts.total
    }
}
