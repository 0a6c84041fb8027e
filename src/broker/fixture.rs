//! Offline brokerage roster
//!
//! Serves logins from a JSON file instead of the vendor SDK. Useful for demos
//! and for exercising the front ends without credentials.
//!
//! ```json
//! {
//!   "contracts_status": "Ready",
//!   "users": [
//!     {
//!       "owner_id": "A123456789",
//!       "secret": "demo",
//!       "accounts": [
//!         { "kind": "equities", "owner_id": "A123456789", "broker_id": "9A95",
//!           "account_id": "S1", "signed": true }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BrokerClient, BrokerConnector, LoginOptions};
use crate::error::{TraderError, TraderResult};
use crate::models::{Account, TradingMode};

/// One login the roster accepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterUser {
    pub owner_id: String,
    pub secret: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Contents of a roster file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default = "default_contracts_status")]
    pub contracts_status: String,
    #[serde(default)]
    pub users: Vec<RosterUser>,
}

fn default_contracts_status() -> String {
    "Ready".to_string()
}

impl Roster {
    /// Read a roster file
    pub fn load(path: &Path) -> TraderResult<Self> {
        let file = File::open(path).map_err(|e| {
            TraderError::Config(format!("Failed to open roster {}: {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TraderError::Config(format!("Failed to parse roster {}: {}", path.display(), e))
        })
    }

    fn accounts_for(&self, owner_id: &str, secret: &str) -> Vec<Account> {
        self.users
            .iter()
            .find(|u| u.owner_id == owner_id && u.secret == secret)
            .map(|u| u.accounts.clone())
            .unwrap_or_default()
    }
}

/// `BrokerClient` that answers from a `Roster`
#[derive(Debug)]
pub struct FixtureBroker {
    roster: Roster,
    logged_in: bool,
}

impl FixtureBroker {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            logged_in: false,
        }
    }
}

impl BrokerClient for FixtureBroker {
    fn login(
        &mut self,
        owner_id: &str,
        secret: &str,
        _options: &LoginOptions,
    ) -> TraderResult<Vec<Account>> {
        let accounts = self.roster.accounts_for(owner_id, secret);
        self.logged_in = !accounts.is_empty();
        Ok(accounts)
    }

    fn logout(&mut self) -> TraderResult<()> {
        if !self.logged_in {
            return Err(TraderError::Broker("No active session".into()));
        }
        self.logged_in = false;
        Ok(())
    }

    fn set_default_account(&mut self, account: &Account) -> TraderResult<()> {
        if !self.logged_in {
            return Err(TraderError::Broker("No active session".into()));
        }
        let known = self
            .roster
            .users
            .iter()
            .flat_map(|u| u.accounts.iter())
            .any(|a| a.account_id == account.account_id && a.kind == account.kind);
        if known {
            Ok(())
        } else {
            Err(TraderError::account_not_found(&account.account_id))
        }
    }

    fn contracts_status(&self) -> TraderResult<String> {
        Ok(self.roster.contracts_status.clone())
    }
}

/// Connector that loads the roster file on every connect
#[derive(Debug, Clone)]
pub struct FixtureConnector {
    path: PathBuf,
}

impl FixtureConnector {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BrokerConnector for FixtureConnector {
    fn connect(&self, _mode: TradingMode) -> TraderResult<Box<dyn BrokerClient>> {
        Ok(Box::new(FixtureBroker::new(Roster::load(&self.path)?)))
    }
}
