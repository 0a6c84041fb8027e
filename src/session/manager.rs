//! Session manager
//!
//! Owns one brokerage SDK handle and the account state of the session it
//! authenticated. Every operation is synchronous and reports failure as a
//! boolean or a neutral value; errors from the SDK never escape.

use crate::broker::{BrokerClient, BrokerConnector, LoginOptions};
use crate::error::{TraderError, TraderResult};
use crate::journal::{EventSink, JournalEntry, SessionEvent};
use crate::models::{Account, AccountKind, AccountTypeFilter, SessionId, TradingMode};

use super::report::{AccountDetail, AccountTypeCounts, SessionStatus};
use super::state::{SessionState, SwitchRejection};

/// Contract status reported while no session is active
pub const NOT_LOGGED_IN: &str = "Not logged in";

/// Authenticated session and account selection for one SDK client
pub struct SessionManager {
    mode: TradingMode,
    connector: Box<dyn BrokerConnector>,
    /// `None` until the first login and after teardown
    client: Option<Box<dyn BrokerClient>>,
    options: LoginOptions,
    sink: Box<dyn EventSink>,
    state: SessionState,
    session_id: Option<SessionId>,
}

impl SessionManager {
    /// Create a logged-out manager for `mode`
    pub fn new(
        mode: TradingMode,
        connector: Box<dyn BrokerConnector>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            mode,
            connector,
            client: None,
            options: LoginOptions::default(),
            sink,
            state: SessionState::new(),
            session_id: None,
        }
    }

    /// Override the options sent with every login
    pub fn with_login_options(mut self, options: LoginOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mode(&self) -> TradingMode {
        self.mode
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn filter(&self) -> AccountTypeFilter {
        self.state.filter()
    }

    fn emit(&self, event: SessionEvent) {
        self.sink.record(&JournalEntry::new(self.session_id, event));
    }

    fn authenticate(&mut self, owner_id: &str, secret: &str) -> TraderResult<Vec<Account>> {
        let client = match self.client.take() {
            Some(client) => client,
            None => self.connector.connect(self.mode)?,
        };
        self.client.insert(client).login(owner_id, secret, &self.options)
    }

    /// Log the SDK session out and release the handle; errors are journaled only
    fn close_client(&mut self) {
        if let Some(mut client) = self.client.take() {
            if let Err(e) = client.logout() {
                self.emit(SessionEvent::TeardownError {
                    reason: e.to_string(),
                });
            }
            client.release();
        }
    }

    /// Record a failed login and leave the manager fully logged out
    ///
    /// A session that was live before the attempt is closed in the SDK too.
    fn fail_login(&mut self, owner_id: &str, reason: impl Into<String>, was_live: bool) -> bool {
        self.emit(SessionEvent::LoginFailed {
            owner_id: owner_id.to_string(),
            reason: reason.into(),
        });
        if was_live {
            self.close_client();
        }
        self.state.clear();
        self.session_id = None;
        false
    }

    /// Log in and capture the accounts the SDK reports
    ///
    /// On success the account list becomes this session's snapshot, `filter`
    /// selects the visible view and both defaults are computed from the full
    /// list. On any failure the manager is left fully logged out.
    pub fn login(&mut self, owner_id: &str, secret: &str, filter: AccountTypeFilter) -> bool {
        let owner_id = owner_id.trim();
        let was_live = self.state.is_authenticated();
        self.emit(SessionEvent::LoginAttempt {
            owner_id: owner_id.to_string(),
            mode: self.mode,
        });

        if owner_id.is_empty() {
            return self.fail_login(owner_id, "User ID cannot be empty", was_live);
        }
        if secret.is_empty() {
            return self.fail_login(owner_id, "Password cannot be empty", was_live);
        }

        let accounts = match self.authenticate(owner_id, secret) {
            Ok(accounts) if !accounts.is_empty() => accounts,
            Ok(_) => return self.fail_login(owner_id, "no accounts returned", was_live),
            Err(e) => return self.fail_login(owner_id, e.to_string(), was_live),
        };

        self.session_id = Some(SessionId::new());
        self.state = SessionState::authenticated(accounts, filter);

        self.emit(SessionEvent::LoginSucceeded {
            owner_id: owner_id.to_string(),
            total: self.state.all_accounts().len(),
        });
        for (i, account) in self.state.all_accounts().iter().enumerate() {
            self.emit(SessionEvent::discovered(i, account));
        }
        self.emit(SessionEvent::FilterApplied {
            filter,
            visible: self.state.visible_count(),
        });

        true
    }

    /// Close the session and release the SDK handle
    ///
    /// Returns `false` only when no session is active. SDK errors during
    /// teardown are journaled and otherwise ignored; local state is always
    /// cleared.
    pub fn logout(&mut self) -> bool {
        if !self.state.is_authenticated() {
            self.emit(SessionEvent::LogoutRejected {
                reason: NOT_LOGGED_IN.to_string(),
            });
            return false;
        }

        self.close_client();
        self.emit(SessionEvent::LogoutSucceeded);
        self.state.clear();
        self.session_id = None;
        true
    }

    /// Show a different account type without logging in again
    ///
    /// The view is rebuilt from the full snapshot. A filter that matches no
    /// account is refused and the current view is kept.
    pub fn switch_account_type(&mut self, filter: AccountTypeFilter) -> bool {
        match self.state.apply_filter(filter) {
            Ok(visible) => {
                self.emit(SessionEvent::FilterApplied { filter, visible });
                true
            }
            Err(SwitchRejection::NotAuthenticated) => {
                self.emit(SessionEvent::NotLoggedIn {
                    operation: "switch account type".to_string(),
                });
                false
            }
            Err(SwitchRejection::NoMatchingAccounts) => {
                self.emit(SessionEvent::SwitchRejected {
                    filter,
                    reason: "no matching accounts".to_string(),
                });
                false
            }
        }
    }

    /// Accounts passing the current filter, in login order
    pub fn list_visible_accounts(&self) -> Vec<&Account> {
        if !self.state.is_authenticated() {
            self.emit(SessionEvent::NotLoggedIn {
                operation: "list accounts".to_string(),
            });
            return Vec::new();
        }
        self.state.visible_accounts()
    }

    /// Every account of the session with its visibility and default flags
    pub fn list_all_account_details(&self) -> Vec<AccountDetail> {
        self.state
            .all_accounts()
            .iter()
            .enumerate()
            .map(|(i, account)| AccountDetail {
                index: i + 1,
                kind: account.kind,
                owner_id: account.owner_id.clone(),
                broker_id: account.broker_id.clone(),
                account_id: account.account_id.clone(),
                signed: account.signed,
                trader: account.trader.clone(),
                visible: self.state.is_visible(i),
                is_default: self.state.is_default(i),
            })
            .collect()
    }

    pub fn account_type_counts(&self) -> AccountTypeCounts {
        self.state.counts()
    }

    pub fn default_account(&self, kind: AccountKind) -> Option<&Account> {
        self.state.default_account(kind)
    }

    /// Make a signed account the default for its kind, locally and in the SDK
    ///
    /// The same account number may exist under both kinds, so the account is
    /// identified by kind, broker and number together.
    pub fn set_default_account(
        &mut self,
        kind: AccountKind,
        broker_id: &str,
        account_id: &str,
    ) -> bool {
        if !self.state.is_authenticated() {
            self.emit(SessionEvent::NotLoggedIn {
                operation: "set default account".to_string(),
            });
            return false;
        }

        let index = match self.state.position(kind, broker_id, account_id) {
            Some(index) => index,
            None => return self.reject_default(account_id, "account not found"),
        };
        let account = self.state.all_accounts()[index].clone();
        if !account.signed {
            return self.reject_default(account_id, "account is not signed");
        }

        let result = match self.client.as_mut() {
            Some(client) => client.set_default_account(&account),
            None => Err(TraderError::Broker("no brokerage connection".into())),
        };
        if let Err(e) = result {
            return self.reject_default(account_id, e.to_string());
        }

        if let Some(kind) = self.state.set_default(index) {
            self.emit(SessionEvent::DefaultAccountSet {
                kind,
                account_id: account.account_id,
            });
        }
        true
    }

    fn reject_default(&self, account_id: &str, reason: impl Into<String>) -> bool {
        self.emit(SessionEvent::DefaultAccountRejected {
            account_id: account_id.to_string(),
            reason: reason.into(),
        });
        false
    }

    /// Contract reference-data status, passed through from the SDK
    pub fn contracts_status(&self) -> String {
        if !self.state.is_authenticated() {
            return NOT_LOGGED_IN.to_string();
        }
        match self.client.as_ref().map(|c| c.contracts_status()) {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                self.emit(SessionEvent::ContractsStatusUnavailable {
                    reason: e.to_string(),
                });
                "Error".to_string()
            }
            None => "Error".to_string(),
        }
    }

    pub fn session_status(&self) -> SessionStatus {
        let defaults = self.state.defaults();
        SessionStatus {
            mode: self.mode,
            authenticated: self.state.is_authenticated(),
            session_id: self.session_id,
            filter: self.state.filter(),
            visible_count: self.state.visible_count(),
            counts: self.state.counts(),
            has_default_equities: defaults.equities.is_some(),
            has_default_derivatives: defaults.derivatives.is_some(),
            contracts_status: self.contracts_status(),
        }
    }

    /// Log out if needed and release the SDK handle
    ///
    /// Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.state.is_authenticated() {
            self.logout();
        }
        if let Some(mut client) = self.client.take() {
            client.release();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::MemorySink;
    use std::sync::{Arc, Mutex};

    /// Scripted SDK: returns fixed accounts and records every call
    #[derive(Clone, Default)]
    struct Script {
        accounts: Vec<Account>,
        login_error: bool,
        /// Logins after this many succeed with no accounts
        logins_with_accounts: Option<usize>,
        logout_error: bool,
        contracts_error: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    struct ScriptedClient(Script);

    impl ScriptedClient {
        fn log(&self, call: &str) {
            self.0.calls.lock().unwrap().push(call.to_string());
        }
    }

    impl BrokerClient for ScriptedClient {
        fn login(&mut self, _: &str, _: &str, _: &LoginOptions) -> TraderResult<Vec<Account>> {
            self.log("login");
            if self.0.login_error {
                return Err(TraderError::Broker("connection refused".into()));
            }
            let logins = self.0.calls.lock().unwrap().iter().filter(|c| *c == "login").count();
            match self.0.logins_with_accounts {
                Some(limit) if logins > limit => Ok(Vec::new()),
                _ => Ok(self.0.accounts.clone()),
            }
        }

        fn logout(&mut self) -> TraderResult<()> {
            self.log("logout");
            if self.0.logout_error {
                return Err(TraderError::Broker("socket closed".into()));
            }
            Ok(())
        }

        fn set_default_account(&mut self, account: &Account) -> TraderResult<()> {
            self.log(&format!(
                "default:{}:{}/{}",
                account.kind, account.broker_id, account.account_id
            ));
            Ok(())
        }

        fn contracts_status(&self) -> TraderResult<String> {
            if self.0.contracts_error {
                return Err(TraderError::Broker("contracts not loaded".into()));
            }
            Ok("Ready".into())
        }

        fn release(&mut self) {
            self.log("release");
        }
    }

    fn manager(script: &Script) -> (SessionManager, MemorySink) {
        let sink = MemorySink::new();
        let script = script.clone();
        let connector = move |_: TradingMode| -> TraderResult<Box<dyn BrokerClient>> {
            Ok(Box::new(ScriptedClient(script.clone())))
        };
        let manager = SessionManager::new(
            TradingMode::Simulation,
            Box::new(connector),
            Box::new(sink.clone()),
        );
        (manager, sink)
    }

    fn sample_accounts() -> Vec<Account> {
        vec![
            Account::new(AccountKind::Equities, "A1", "9A95", "S1").with_signed(true),
            Account::new(AccountKind::Derivatives, "A1", "F002", "F1").with_signed(true),
            Account::new(AccountKind::Equities, "A1", "9A95", "S2"),
        ]
    }

    fn script() -> Script {
        Script {
            accounts: sample_accounts(),
            ..Default::default()
        }
    }

    fn visible_ids(manager: &SessionManager) -> Vec<String> {
        manager
            .list_visible_accounts()
            .iter()
            .map(|a| a.account_id.clone())
            .collect()
    }

    #[test]
    fn test_login_success() {
        let (mut manager, sink) = manager(&script());

        assert!(manager.login("A1", "pw", AccountTypeFilter::All));
        assert!(manager.is_connected());
        assert!(manager.session_id().is_some());
        assert_eq!(visible_ids(&manager), vec!["S1", "F1", "S2"]);
        assert_eq!(sink.count("account_discovered"), 3);
        assert_eq!(sink.count("login_succeeded"), 1);
    }

    #[test]
    fn test_login_with_no_accounts_fails() {
        let (mut manager, sink) = manager(&Script::default());

        assert!(!manager.login("A1", "pw", AccountTypeFilter::All));
        assert!(!manager.is_connected());
        assert!(manager.list_all_account_details().is_empty());
        assert_eq!(sink.count("login_failed"), 1);
    }

    #[test]
    fn test_login_error_does_not_escape() {
        let mut s = script();
        s.login_error = true;
        let (mut manager, sink) = manager(&s);

        assert!(!manager.login("A1", "pw", AccountTypeFilter::All));
        assert_eq!(manager.account_type_counts(), AccountTypeCounts::default());
        match sink.events().last() {
            Some(SessionEvent::LoginFailed { reason, .. }) => {
                assert!(reason.contains("connection refused"))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_connect_error_is_login_failure() {
        let sink = MemorySink::new();
        let connector = |_: TradingMode| -> TraderResult<Box<dyn BrokerClient>> {
            Err(TraderError::Broker("bridge down".into()))
        };
        let mut manager = SessionManager::new(
            TradingMode::Production,
            Box::new(connector),
            Box::new(sink.clone()),
        );
        assert!(!manager.login("A1", "pw", AccountTypeFilter::All));
        assert_eq!(sink.count("login_failed"), 1);
    }

    #[test]
    fn test_empty_credentials_skip_broker() {
        let s = script();
        let (mut manager, _sink) = manager(&s);

        assert!(!manager.login("  ", "pw", AccountTypeFilter::All));
        assert!(!manager.login("A1", "", AccountTypeFilter::All));
        assert!(s.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_relogin_clears_previous_state() {
        let s = script();
        let (mut manager, _sink) = manager(&s);
        assert!(manager.login("A1", "pw", AccountTypeFilter::All));

        assert!(!manager.login("", "pw", AccountTypeFilter::All));
        assert!(!manager.is_connected());
        assert!(manager.list_visible_accounts().is_empty());
        assert!(manager.default_account(AccountKind::Equities).is_none());
        assert_eq!(*s.calls.lock().unwrap(), vec!["login", "logout", "release"]);
    }

    #[test]
    fn test_relogin_without_accounts_closes_old_session() {
        let mut s = script();
        s.logins_with_accounts = Some(1);
        let (mut manager, sink) = manager(&s);
        assert!(manager.login("A1", "pw", AccountTypeFilter::All));

        assert!(!manager.login("A1", "pw", AccountTypeFilter::All));
        assert!(!manager.is_connected());
        assert!(manager.session_id().is_none());
        assert!(!manager.logout());
        drop(manager);

        assert_eq!(
            *s.calls.lock().unwrap(),
            vec!["login", "login", "logout", "release"]
        );
        assert_eq!(sink.count("login_failed"), 1);
    }

    #[test]
    fn test_logout_releases_client() {
        let s = script();
        let (mut manager, sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        assert!(manager.logout());
        assert!(!manager.is_connected());
        assert!(manager.session_id().is_none());
        assert_eq!(*s.calls.lock().unwrap(), vec!["login", "logout", "release"]);
        assert_eq!(sink.count("logout_succeeded"), 1);
    }

    #[test]
    fn test_logout_when_not_logged_in() {
        let s = script();
        let (mut manager, sink) = manager(&s);

        assert!(!manager.logout());
        assert_eq!(sink.count("logout_rejected"), 1);
        assert!(s.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_logout_error_still_clears_state() {
        let mut s = script();
        s.logout_error = true;
        let (mut manager, sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        assert!(manager.logout());
        assert!(!manager.is_connected());
        assert_eq!(sink.count("teardown_error"), 1);
        assert!(s.calls.lock().unwrap().contains(&"release".to_string()));
    }

    #[test]
    fn test_relogin_after_logout_reconnects() {
        let s = script();
        let (mut manager, _sink) = manager(&s);

        assert!(manager.login("A1", "pw", AccountTypeFilter::All));
        let first = manager.session_id();
        assert!(manager.logout());
        assert!(manager.login("A1", "pw", AccountTypeFilter::DerivativesOnly));
        assert_ne!(manager.session_id(), first);
        assert_eq!(visible_ids(&manager), vec!["F1"]);
    }

    #[test]
    fn test_switch_requires_login() {
        let (mut manager, sink) = manager(&script());
        assert!(!manager.switch_account_type(AccountTypeFilter::EquitiesOnly));
        assert_eq!(sink.count("not_logged_in"), 1);
    }

    #[test]
    fn test_switch_to_missing_kind_keeps_view() {
        let mut s = script();
        s.accounts.retain(|a| a.kind == AccountKind::Equities);
        let (mut manager, sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::EquitiesOnly);

        assert!(!manager.switch_account_type(AccountTypeFilter::DerivativesOnly));
        assert_eq!(visible_ids(&manager), vec!["S1", "S2"]);
        assert_eq!(manager.filter(), AccountTypeFilter::EquitiesOnly);
        assert_eq!(sink.count("switch_rejected"), 1);
    }

    #[test]
    fn test_details_mark_visibility_and_defaults() {
        let (mut manager, _sink) = manager(&script());
        manager.login("A1", "pw", AccountTypeFilter::EquitiesOnly);

        let details = manager.list_all_account_details();
        assert_eq!(details.len(), 3);
        assert_eq!(details[0].index, 1);
        assert!(details[0].visible && details[0].is_default);
        assert!(!details[1].visible && details[1].is_default);
        assert!(details[2].visible && !details[2].is_default);
    }

    #[test]
    fn test_set_default_account() {
        let mut s = script();
        s.accounts.push(Account::new(AccountKind::Equities, "A1", "9A95", "S3").with_signed(true));
        let (mut manager, sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        assert!(manager.set_default_account(AccountKind::Equities, "9A95", "S3"));
        assert_eq!(
            manager.default_account(AccountKind::Equities).map(|a| a.account_id.as_str()),
            Some("S3")
        );
        assert!(s
            .calls
            .lock()
            .unwrap()
            .contains(&"default:Equities:9A95/S3".to_string()));

        assert!(!manager.set_default_account(AccountKind::Equities, "9A95", "S2"));
        assert!(!manager.set_default_account(AccountKind::Equities, "9A95", "nope"));
        assert!(!manager.set_default_account(AccountKind::Derivatives, "9A95", "S3"));
        assert_eq!(sink.count("default_account_rejected"), 3);
        assert_eq!(
            manager.default_account(AccountKind::Equities).map(|a| a.account_id.as_str()),
            Some("S3")
        );
    }

    #[test]
    fn test_set_default_with_shared_account_number() {
        let s = Script {
            accounts: vec![
                Account::new(AccountKind::Equities, "A1", "9A95", "0001").with_signed(true),
                Account::new(AccountKind::Derivatives, "A1", "F002", "0001").with_signed(true),
                Account::new(AccountKind::Derivatives, "A1", "F003", "0002").with_signed(true),
            ],
            ..Default::default()
        };
        let (mut manager, _sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        assert!(manager.set_default_account(AccountKind::Derivatives, "F003", "0002"));
        assert!(manager.set_default_account(AccountKind::Derivatives, "F002", "0001"));

        let derivatives = manager.default_account(AccountKind::Derivatives).unwrap();
        assert_eq!((derivatives.broker_id.as_str(), derivatives.account_id.as_str()), ("F002", "0001"));
        let equities = manager.default_account(AccountKind::Equities).unwrap();
        assert_eq!(equities.broker_id, "9A95");

        let calls = s.calls.lock().unwrap();
        assert!(calls.contains(&"default:Derivatives:F002/0001".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("default:Equities")));
    }

    #[test]
    fn test_contracts_error_is_not_a_teardown_error() {
        let mut s = script();
        s.contracts_error = true;
        let (mut manager, sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        assert_eq!(manager.contracts_status(), "Error");
        assert_eq!(sink.count("contracts_status_unavailable"), 1);
        assert_eq!(sink.count("teardown_error"), 0);
    }

    #[test]
    fn test_status_pass_through() {
        let (mut manager, _sink) = manager(&script());

        let status = manager.session_status();
        assert!(!status.authenticated);
        assert_eq!(status.contracts_status, NOT_LOGGED_IN);
        assert_eq!(status.total_count(), 0);

        manager.login("A1", "pw", AccountTypeFilter::All);
        let status = manager.session_status();
        assert!(status.authenticated);
        assert_eq!(status.mode, TradingMode::Simulation);
        assert_eq!(status.visible_count, 3);
        assert_eq!(status.counts.of(AccountKind::Equities), 2);
        assert!(status.has_default_equities && status.has_default_derivatives);
        assert_eq!(status.contracts_status, "Ready");
    }

    #[test]
    fn test_drop_logs_out_and_releases() {
        let s = script();
        {
            let (mut manager, _sink) = manager(&s);
            manager.login("A1", "pw", AccountTypeFilter::All);
        }
        assert_eq!(*s.calls.lock().unwrap(), vec!["login", "logout", "release"]);
    }

    #[test]
    fn test_shutdown_releases_unauthenticated_client() {
        let s = Script::default();
        let (mut manager, _sink) = manager(&s);
        manager.login("A1", "pw", AccountTypeFilter::All);

        manager.shutdown();
        manager.shutdown();
        assert_eq!(*s.calls.lock().unwrap(), vec!["login", "release"]);
    }
}
