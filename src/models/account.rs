//! Brokerage account model
//!
//! Accounts are owned by the brokerage SDK and only ever read here. The
//! account kind is classified once, when the SDK result is ingested.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of brokerage account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Securities (stock) account
    #[serde(alias = "stock", alias = "StockAccount")]
    Equities,
    /// Futures and options account
    #[serde(alias = "futures", alias = "futopt", alias = "FutureAccount")]
    Derivatives,
}

impl AccountKind {
    /// Both kinds, in display order
    pub const ALL: [AccountKind; 2] = [AccountKind::Equities, AccountKind::Derivatives];

    /// Parse an account kind from a raw SDK or user supplied label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equities" | "equity" | "stock" | "stocks" | "stockaccount" => Some(Self::Equities),
            "derivatives" | "derivative" | "future" | "futures" | "futopt"
            | "futureaccount" => Some(Self::Derivatives),
            _ => None,
        }
    }

    /// Short label used in tables
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Equities => "EQ",
            Self::Derivatives => "FO",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equities => write!(f, "Equities"),
            Self::Derivatives => write!(f, "Derivatives"),
        }
    }
}

/// A brokerage account reported by the SDK at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account kind
    #[serde(alias = "account_type")]
    pub kind: AccountKind,

    /// Identity of the account owner (person id)
    #[serde(alias = "person_id")]
    pub owner_id: String,

    /// Broker branch identifier
    pub broker_id: String,

    /// Account number
    pub account_id: String,

    /// Whether the account is authorized for trading
    #[serde(default)]
    pub signed: bool,

    /// Trader of record, if the SDK reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trader: Option<String>,
}

impl Account {
    /// Create an unsigned account with no trader
    pub fn new(
        kind: AccountKind,
        owner_id: impl Into<String>,
        broker_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            owner_id: owner_id.into(),
            broker_id: broker_id.into(),
            account_id: account_id.into(),
            signed: false,
            trader: None,
        }
    }

    /// Set the signed flag
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Set the trader of record
    pub fn with_trader(mut self, trader: impl Into<String>) -> Self {
        self.trader = Some(trader.into());
        self
    }

    /// Whether this account may serve as the default for `kind`
    pub fn is_default_candidate(&self, kind: AccountKind) -> bool {
        self.signed && self.kind == kind
    }

    /// Human-readable signed status
    pub fn signed_label(&self) -> &'static str {
        if self.signed {
            "Signed"
        } else {
            "Not Signed"
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.kind, self.broker_id, self.account_id)
    }
}
