//! Brokerage SDK boundary
//!
//! The vendor SDK owns authentication, transport and account discovery. This
//! module defines the narrow contract the session core consumes, plus two
//! implementations of it:
//!
//! - `BridgeBroker`: talks to a local HTTP sidecar that wraps the vendor SDK
//! - `FixtureBroker`: serves accounts from a JSON roster, for offline use
//!
//! # Teardown contract
//!
//! `BrokerClient::release` must guarantee that no background thread or
//! connection started by the client outlives the call. The session core relies
//! on this instead of forcing the process to exit.

pub mod bridge;
pub mod fixture;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::TraderResult;
use crate::models::{Account, TradingMode};

pub use bridge::{BridgeBroker, BridgeConnector};
pub use fixture::{FixtureBroker, FixtureConnector, Roster, RosterUser};

/// Options forwarded to the SDK login call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOptions {
    /// Download contract reference data after login
    pub fetch_contract: bool,
    /// Contract download timeout, in milliseconds
    pub contracts_timeout_ms: u64,
    /// Subscribe to trade reports
    pub subscribe_trade: bool,
    /// SDK receive window, in milliseconds
    pub receive_window_ms: u64,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            fetch_contract: true,
            contracts_timeout_ms: 10_000,
            subscribe_trade: true,
            receive_window_ms: 30_000,
        }
    }
}

/// A live handle to the brokerage SDK
pub trait BrokerClient: Send {
    /// Verify credentials and return the accounts the owner may use
    ///
    /// An empty list means the login was not accepted.
    fn login(
        &mut self,
        owner_id: &str,
        secret: &str,
        options: &LoginOptions,
    ) -> TraderResult<Vec<Account>>;

    /// Terminate the authenticated session
    fn logout(&mut self) -> TraderResult<()>;

    /// Make `account` the SDK default for its kind
    fn set_default_account(&mut self, account: &Account) -> TraderResult<()>;

    /// Contract reference-data readiness, as reported by the SDK
    fn contracts_status(&self) -> TraderResult<String>;

    /// Release every transport resource held by this client
    fn release(&mut self) {}
}

/// Creates `BrokerClient` handles for a trading mode
pub trait BrokerConnector: Send {
    fn connect(&self, mode: TradingMode) -> TraderResult<Box<dyn BrokerClient>>;
}

impl<F> BrokerConnector for F
where
    F: Fn(TradingMode) -> TraderResult<Box<dyn BrokerClient>> + Send,
{
    fn connect(&self, mode: TradingMode) -> TraderResult<Box<dyn BrokerClient>> {
        self(mode)
    }
}

/// Pick the connector configured in `settings`
pub fn connector_from_settings(settings: &Settings) -> Box<dyn BrokerConnector> {
    match &settings.fixture_file {
        Some(path) => Box::new(FixtureConnector::new(path.clone())),
        None => Box::new(BridgeConnector::new(
            settings.bridge_url.clone(),
            settings.request_timeout_secs,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraderError;

    struct Dead;

    impl BrokerClient for Dead {
        fn login(&mut self, _: &str, _: &str, _: &LoginOptions) -> TraderResult<Vec<Account>> {
            Err(TraderError::Broker("offline".into()))
        }
        fn logout(&mut self) -> TraderResult<()> {
            Ok(())
        }
        fn set_default_account(&mut self, _: &Account) -> TraderResult<()> {
            Ok(())
        }
        fn contracts_status(&self) -> TraderResult<String> {
            Ok("Unknown".into())
        }
    }

    #[test]
    fn test_closure_connector() {
        let connector = |mode: TradingMode| -> TraderResult<Box<dyn BrokerClient>> {
            assert_eq!(mode, TradingMode::Production);
            Ok(Box::new(Dead))
        };
        let client = connector.connect(TradingMode::Production).unwrap();
        assert_eq!(client.contracts_status().unwrap(), "Unknown");
    }

    #[test]
    fn test_default_login_options() {
        let options = LoginOptions::default();
        assert!(options.fetch_contract);
        assert!(options.subscribe_trade);
        assert_eq!(options.contracts_timeout_ms, 10_000);
    }
}
