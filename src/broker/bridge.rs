//! HTTP bridge to the vendor SDK
//!
//! The vendor SDK only ships Python bindings. A small sidecar wraps it and
//! exposes a local HTTP API; this client speaks that API with a blocking
//! reqwest client, so the session core stays synchronous.
//!
//! Endpoints:
//! - `POST /login`
//! - `POST /logout`
//! - `POST /default_account`
//! - `GET  /contracts/status`

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BrokerClient, BrokerConnector, LoginOptions};
use crate::error::{TraderError, TraderResult};
use crate::models::{Account, AccountKind, TradingMode};

// ── Bridge API types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BridgeLoginRequest<'a> {
    user_id: &'a str,
    password: &'a str,
    simulation: bool,
    fetch_contract: bool,
    contracts_timeout: u64,
    subscribe_trade: bool,
    receive_window: u64,
}

/// Account as the bridge reports it
#[derive(Debug, Deserialize)]
pub(crate) struct BridgeAccount {
    /// SDK class name, e.g. `StockAccount` or `FutureAccount`
    account_class: String,
    person_id: String,
    broker_id: String,
    account_id: String,
    #[serde(default)]
    signed: Option<bool>,
    #[serde(default)]
    trader: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeLoginResponse {
    accounts: Option<Vec<BridgeAccount>>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BridgeDefaultAccountRequest<'a> {
    account_class: &'a str,
    broker_id: &'a str,
    account_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct BridgeAck {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeContractsStatus {
    status: String,
}

impl TryFrom<BridgeAccount> for Account {
    type Error = TraderError;

    fn try_from(raw: BridgeAccount) -> Result<Self, Self::Error> {
        let kind = AccountKind::parse(&raw.account_class).ok_or_else(|| {
            TraderError::Broker(format!("Unknown account class: {}", raw.account_class))
        })?;

        Ok(Account {
            kind,
            owner_id: raw.person_id,
            broker_id: raw.broker_id,
            account_id: raw.account_id,
            signed: raw.signed.unwrap_or(false),
            trader: raw.trader.filter(|t| !t.is_empty()),
        })
    }
}

fn account_class(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Equities => "StockAccount",
        AccountKind::Derivatives => "FutureAccount",
    }
}

fn check_ack(ack: BridgeAck, action: &str) -> TraderResult<()> {
    match ack.error {
        Some(err) => Err(TraderError::Broker(format!("{} failed: {}", action, err))),
        None if !ack.ok => Err(TraderError::Broker(format!("{} was not acknowledged", action))),
        None => Ok(()),
    }
}

// ── Bridge broker ───────────────────────────────────────────────────

/// `BrokerClient` backed by the SDK bridge sidecar
pub struct BridgeBroker {
    base_url: String,
    mode: TradingMode,
    /// `None` once released
    client: Option<Client>,
}

impl BridgeBroker {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, mode: TradingMode) -> TraderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(3))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode,
            client: Some(client),
        })
    }

    fn client(&self) -> TraderResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| TraderError::Broker("Bridge client already released".into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl BrokerClient for BridgeBroker {
    fn login(
        &mut self,
        owner_id: &str,
        secret: &str,
        options: &LoginOptions,
    ) -> TraderResult<Vec<Account>> {
        let request = BridgeLoginRequest {
            user_id: owner_id,
            password: secret,
            simulation: self.mode.is_simulation(),
            fetch_contract: options.fetch_contract,
            contracts_timeout: options.contracts_timeout_ms,
            subscribe_trade: options.subscribe_trade,
            receive_window: options.receive_window_ms,
        };

        let response: BridgeLoginResponse = self
            .client()?
            .post(self.url("/login"))
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(err) = response.error {
            return Err(TraderError::Authentication(err));
        }

        response
            .accounts
            .unwrap_or_default()
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    fn logout(&mut self) -> TraderResult<()> {
        let ack: BridgeAck = self
            .client()?
            .post(self.url("/logout"))
            .send()?
            .error_for_status()?
            .json()?;
        check_ack(ack, "Logout")
    }

    fn set_default_account(&mut self, account: &Account) -> TraderResult<()> {
        let request = BridgeDefaultAccountRequest {
            account_class: account_class(account.kind),
            broker_id: &account.broker_id,
            account_id: &account.account_id,
        };
        let ack: BridgeAck = self
            .client()?
            .post(self.url("/default_account"))
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        check_ack(ack, "Set default account")
    }

    fn contracts_status(&self) -> TraderResult<String> {
        let status: BridgeContractsStatus = self
            .client()?
            .get(self.url("/contracts/status"))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(status.status)
    }

    fn release(&mut self) {
        // Dropping the blocking client joins its internal runtime thread.
        if self.client.take().is_some() {
            debug!(base_url = %self.base_url, "bridge client released");
        }
    }
}

/// Connector that opens a `BridgeBroker` per session
#[derive(Debug, Clone)]
pub struct BridgeConnector {
    base_url: String,
    timeout_secs: u64,
}

impl BridgeConnector {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }
}

impl BrokerConnector for BridgeConnector {
    fn connect(&self, mode: TradingMode) -> TraderResult<Box<dyn BrokerClient>> {
        Ok(Box::new(BridgeBroker::new(
            self.base_url.clone(),
            self.timeout_secs,
            mode,
        )?))
    }
}
