//! Account type filter
//!
//! Pure view selection over the account snapshot taken at login.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::{Account, AccountKind};

/// Which account kinds are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTypeFilter {
    /// Every account
    #[default]
    All,
    /// Equities accounts only
    #[serde(alias = "stock")]
    EquitiesOnly,
    /// Derivatives accounts only
    #[serde(alias = "futures")]
    DerivativesOnly,
}

impl AccountTypeFilter {
    /// All filters, in menu order
    pub const ALL: [AccountTypeFilter; 3] = [
        AccountTypeFilter::All,
        AccountTypeFilter::EquitiesOnly,
        AccountTypeFilter::DerivativesOnly,
    ];

    /// The single kind this filter selects, if any
    pub fn kind(&self) -> Option<AccountKind> {
        match self {
            Self::All => None,
            Self::EquitiesOnly => Some(AccountKind::Equities),
            Self::DerivativesOnly => Some(AccountKind::Derivatives),
        }
    }

    /// Whether an account passes this filter
    pub fn matches(&self, account: &Account) -> bool {
        self.kind().map_or(true, |kind| account.kind == kind)
    }

    /// Parse from a user supplied label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "equities" | "equities_only" | "equities-only" | "stock" | "stocks" => {
                Some(Self::EquitiesOnly)
            }
            "derivatives" | "derivatives_only" | "derivatives-only" | "futures" | "future" => {
                Some(Self::DerivativesOnly)
            }
            _ => None,
        }
    }

    /// Cycle to the next filter (used by the TUI radio group)
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::EquitiesOnly,
            Self::EquitiesOnly => Self::DerivativesOnly,
            Self::DerivativesOnly => Self::All,
        }
    }
}

impl fmt::Display for AccountTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All accounts"),
            Self::EquitiesOnly => write!(f, "Equities only"),
            Self::DerivativesOnly => write!(f, "Derivatives only"),
        }
    }
}
