//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! It owns the `SessionManager` whenever no worker is running; while a worker
//! holds it, `manager` is `None` and `busy` names the task in flight.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use zeroize::Zeroizing;

use crate::cli::build_manager;
use crate::config::{Settings, TraderPaths};
use crate::journal::{ChannelSink, FanoutSink, JournalSink};
use crate::models::{AccountTypeFilter, TradingMode};
use crate::session::{AccountDetail, AccountTypeCounts, SessionManager};

use super::widgets::TextInput;
use super::worker::{spawn_login, spawn_logout, WorkerOutcome, WorkerTask};

/// Lines kept in the log panel
pub const LOG_CAPACITY: usize = 500;

/// Which control currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    UserId,
    Password,
    Mode,
    Filter,
    Accounts,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::UserId,
        Focus::Password,
        Focus::Mode,
        Focus::Filter,
        Focus::Accounts,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, Focus::UserId | Focus::Password)
    }
}

/// What a confirmation dialog is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Switch to the real trading environment
    ProductionMode,
    /// Quit while a session is active
    Quit,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ProductionMode => "Switch to PRODUCTION mode? Orders would reach the real market.",
            Self::Quit => "You are still logged in. Logout and quit?",
        }
    }
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    Confirm(Confirmation),
}

/// Main application state
pub struct App {
    pub settings: Settings,
    paths: Option<TraderPaths>,

    /// Mode of the current manager
    pub mode: TradingMode,
    /// Selected account type filter
    pub filter: AccountTypeFilter,

    pub user_id: TextInput,
    pub password: TextInput,
    pub focus: Focus,
    pub active_dialog: ActiveDialog,

    /// `None` while a worker holds the manager
    manager: Option<SessionManager>,
    busy: Option<WorkerTask>,
    /// User id the running login was started with
    login_user: String,
    worker: Option<JoinHandle<()>>,
    results_tx: Sender<WorkerOutcome>,
    results_rx: Receiver<WorkerOutcome>,
    log_tx: Sender<String>,
    log_rx: Receiver<String>,

    /// Session log lines, oldest first
    pub log: VecDeque<String>,
    /// Connection status line
    pub status: String,
    /// Selected row of the account table
    pub selected_account: usize,

    /// Quit once the running worker returns
    quit_pending: bool,
    pub should_quit: bool,
}

impl App {
    /// Create the app with a logged-out manager
    ///
    /// `paths` enables the on-disk journal when settings allow it.
    pub fn new(
        settings: Settings,
        paths: Option<TraderPaths>,
        mode: TradingMode,
        filter: AccountTypeFilter,
        user_id: Option<String>,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        let (log_tx, log_rx) = mpsc::channel();

        let mut app = Self {
            settings,
            paths,
            mode,
            filter,
            user_id: TextInput::new()
                .label("User ID")
                .placeholder("A123456789")
                .content(user_id.unwrap_or_default()),
            password: TextInput::new().label("Password").masked(),
            focus: Focus::default(),
            active_dialog: ActiveDialog::default(),
            manager: None,
            busy: None,
            login_user: String::new(),
            worker: None,
            results_tx,
            results_rx,
            log_tx,
            log_rx,
            log: VecDeque::new(),
            status: "Not connected".to_string(),
            selected_account: 0,
            quit_pending: false,
            should_quit: false,
        };
        if !app.user_id.value().is_empty() {
            app.focus = Focus::Password;
        }
        app.rebuild_manager();
        app.push_log(format!("Client initialized in {} mode", mode));
        app
    }

    fn rebuild_manager(&mut self) {
        let mut sink = FanoutSink::new().with(ChannelSink::new(self.log_tx.clone()));
        if let Some(paths) = &self.paths {
            if self.settings.journal_enabled && paths.ensure_directories().is_ok() {
                sink = sink.with(JournalSink::new(paths.journal_file()));
            }
        }
        // Dropping the previous manager releases its SDK handle.
        self.manager = None;
        self.manager = Some(build_manager(&self.settings, self.mode, Box::new(sink)));
    }

    /// Append a line to the log panel
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push_back(line.into());
        while self.log.len() > LOG_CAPACITY {
            self.log.pop_front();
        }
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn busy(&self) -> Option<WorkerTask> {
        self.busy
    }

    pub fn is_connected(&self) -> bool {
        self.manager.as_ref().map_or(false, |m| m.is_connected())
    }

    pub fn manager(&self) -> Option<&SessionManager> {
        self.manager.as_ref()
    }

    pub fn account_details(&self) -> Vec<AccountDetail> {
        self.manager
            .as_ref()
            .map(|m| m.list_all_account_details())
            .unwrap_or_default()
    }

    pub fn account_counts(&self) -> AccountTypeCounts {
        self.manager
            .as_ref()
            .map(|m| m.account_type_counts())
            .unwrap_or_default()
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Start a login with the form contents
    pub fn start_login(&mut self) {
        if self.busy.is_some() {
            return;
        }
        if self.is_connected() {
            self.push_log("Already logged in. Please logout first.");
            return;
        }

        let user_id = self.user_id.value().trim().to_string();
        if user_id.is_empty() {
            self.status = "Please enter User ID".to_string();
            self.focus = Focus::UserId;
            return;
        }
        if self.password.value().is_empty() {
            self.status = "Please enter Password".to_string();
            self.focus = Focus::Password;
            return;
        }

        let manager = match self.manager.take() {
            Some(manager) => manager,
            None => return,
        };
        let secret = Zeroizing::new(self.password.value().to_string());
        self.password.clear();

        self.busy = Some(WorkerTask::Login);
        self.status = WorkerTask::Login.in_progress_label().to_string();
        self.login_user = user_id.clone();
        self.worker = Some(spawn_login(
            manager,
            user_id,
            secret,
            self.filter,
            self.results_tx.clone(),
        ));
    }

    /// Start a logout of the current session
    pub fn start_logout(&mut self) {
        if self.busy.is_some() || !self.is_connected() {
            return;
        }
        let manager = match self.manager.take() {
            Some(manager) => manager,
            None => return,
        };
        self.busy = Some(WorkerTask::Logout);
        self.status = WorkerTask::Logout.in_progress_label().to_string();
        self.worker = Some(spawn_logout(manager, self.results_tx.clone()));
    }

    /// Ask to quit, confirming first when a session is active
    pub fn request_quit(&mut self) {
        if self.busy.is_some() {
            self.quit_pending = true;
            return;
        }
        if self.is_connected() {
            self.open_dialog(ActiveDialog::Confirm(Confirmation::Quit));
        } else {
            self.should_quit = true;
        }
    }

    /// Logout then quit, after the user confirmed
    pub fn confirm_quit(&mut self) {
        self.quit_pending = true;
        self.start_logout();
        if self.busy.is_none() {
            self.should_quit = true;
        }
    }

    /// Select the trading mode; Production needs confirmation first
    pub fn request_mode(&mut self, mode: TradingMode) {
        if mode == self.mode {
            return;
        }
        if self.busy.is_some() || self.is_connected() {
            self.push_log("Mode can only be changed while logged out.");
            return;
        }
        match mode {
            TradingMode::Production => {
                self.open_dialog(ActiveDialog::Confirm(Confirmation::ProductionMode))
            }
            TradingMode::Simulation => self.apply_mode(mode),
        }
    }

    /// Switch mode and rebuild the manager
    pub fn apply_mode(&mut self, mode: TradingMode) {
        if self.busy.is_some() || self.is_connected() {
            return;
        }
        self.mode = mode;
        self.rebuild_manager();
        self.push_log(format!("Switched to {} mode", mode));
    }

    pub fn toggle_mode(&mut self) {
        let target = match self.mode {
            TradingMode::Simulation => TradingMode::Production,
            TradingMode::Production => TradingMode::Simulation,
        };
        self.request_mode(target);
    }

    /// Select an account type; applied to the live session when logged in
    pub fn select_filter(&mut self, filter: AccountTypeFilter) {
        if self.busy.is_some() {
            return;
        }
        match self.manager.as_mut() {
            Some(manager) if manager.is_connected() => {
                manager.switch_account_type(filter);
                self.filter = manager.filter();
            }
            _ => self.filter = filter,
        }
        self.selected_account = 0;
    }

    /// Make the selected table row the default for its kind
    pub fn set_selected_default(&mut self) {
        let detail = match self.account_details().into_iter().nth(self.selected_account) {
            Some(detail) => detail,
            None => return,
        };
        if let Some(manager) = self.manager.as_mut() {
            manager.set_default_account(detail.kind, &detail.broker_id, &detail.account_id);
        }
    }

    pub fn select_next_account(&mut self) {
        let count = self.account_details().len();
        if count > 0 && self.selected_account + 1 < count {
            self.selected_account += 1;
        }
    }

    pub fn select_previous_account(&mut self) {
        self.selected_account = self.selected_account.saturating_sub(1);
    }

    /// Drain log lines and worker results; called on every tick
    pub fn poll(&mut self) {
        while let Ok(line) = self.log_rx.try_recv() {
            self.push_log(line);
        }

        match self.results_rx.try_recv() {
            Ok(outcome) => self.finish(outcome),
            Err(TryRecvError::Empty) => self.check_worker(),
            Err(TryRecvError::Disconnected) => {}
        }

        while let Ok(line) = self.log_rx.try_recv() {
            self.push_log(line);
        }
    }

    fn finish(&mut self, outcome: WorkerOutcome) {
        self.worker = None;
        self.busy = None;
        let connected = outcome.manager.is_connected();
        self.manager = Some(outcome.manager);
        self.selected_account = 0;

        match (outcome.task, outcome.success) {
            (WorkerTask::Login, true) => {
                self.status = format!("Connected as {}", self.login_user);
                self.focus = Focus::Accounts;
            }
            (WorkerTask::Login, false) => self.status = "Login failed".to_string(),
            (WorkerTask::Logout, _) => self.status = "Not connected".to_string(),
        }

        if self.quit_pending {
            if connected {
                self.start_logout();
            } else {
                self.should_quit = true;
            }
        }
    }

    /// Recover if a worker died without reporting back
    fn check_worker(&mut self) {
        let finished = self.worker.as_ref().map_or(false, |w| w.is_finished());
        if !finished {
            return;
        }
        // The worker may have sent its result just before finishing.
        if let Ok(outcome) = self.results_rx.try_recv() {
            self.finish(outcome);
            return;
        }
        self.worker = None;
        self.busy = None;
        self.push_log("Session worker stopped unexpectedly; client was reset.");
        self.status = "Not connected".to_string();
        self.rebuild_manager();
        if self.quit_pending {
            self.should_quit = true;
        }
    }

    /// Wait for any running worker, then log out and release the client
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            if let Ok(outcome) = self.results_rx.try_recv() {
                self.manager = Some(outcome.manager);
            }
            self.busy = None;
        }
        if let Some(manager) = self.manager.as_mut() {
            manager.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const ROSTER: &str = r#"{
        "contracts_status": "Ready",
        "users": [{
            "owner_id": "A1",
            "secret": "pw",
            "accounts": [
                {"kind": "equities", "owner_id": "A1", "broker_id": "9A95", "account_id": "S1", "signed": true},
                {"kind": "equities", "owner_id": "A1", "broker_id": "9A95", "account_id": "S2", "signed": true},
                {"kind": "derivatives", "owner_id": "A1", "broker_id": "F002", "account_id": "F1", "signed": true}
            ]
        }]
    }"#;

    fn fixture_settings(dir: &Path) -> Settings {
        let roster = dir.join("roster.json");
        std::fs::write(&roster, ROSTER).unwrap();
        Settings {
            fixture_file: Some(roster),
            ..Settings::default()
        }
    }

    fn app(dir: &Path) -> App {
        App::new(
            fixture_settings(dir),
            Some(TraderPaths::with_base_dir(dir.to_path_buf())),
            TradingMode::Simulation,
            AccountTypeFilter::All,
            Some("A1".into()),
        )
    }

    fn wait_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        app.poll();
        while app.busy().is_some() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            app.poll();
        }
    }

    fn login(app: &mut App, secret: &str) {
        app.password = TextInput::new().masked().content(secret);
        app.start_login();
        wait_idle(app);
    }

    #[test]
    fn test_status_names_user_the_login_started_with() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        app.password = TextInput::new().masked().content("pw");
        app.start_login();

        app.user_id = TextInput::new().content("B2");
        wait_idle(&mut app);

        assert!(app.is_connected());
        assert_eq!(app.status, "Connected as A1");
    }

    #[test]
    fn test_login_and_logout() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        assert_eq!(app.focus, Focus::Password);

        login(&mut app, "pw");
        assert!(app.is_connected());
        assert_eq!(app.status, "Connected as A1");
        assert_eq!(app.account_details().len(), 3);
        assert!(app.password.value().is_empty());
        assert!(app.log.iter().any(|l| l.contains("Login successful")));

        app.start_logout();
        wait_idle(&mut app);
        assert!(!app.is_connected());
        assert_eq!(app.status, "Not connected");
    }

    #[test]
    fn test_failed_login() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());

        login(&mut app, "nope");
        assert!(!app.is_connected());
        assert_eq!(app.status, "Login failed");
        assert!(app.manager().is_some());
    }

    #[test]
    fn test_login_requires_password() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        app.start_login();
        assert!(app.busy().is_none());
        assert_eq!(app.status, "Please enter Password");
    }

    #[test]
    fn test_production_needs_confirmation() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());

        app.toggle_mode();
        assert_eq!(app.mode, TradingMode::Simulation);
        assert_eq!(
            app.active_dialog,
            ActiveDialog::Confirm(Confirmation::ProductionMode)
        );

        app.close_dialog();
        app.apply_mode(TradingMode::Production);
        assert_eq!(app.mode, TradingMode::Production);
        assert_eq!(app.manager().map(|m| m.mode()), Some(TradingMode::Production));

        app.toggle_mode();
        assert_eq!(app.mode, TradingMode::Simulation);
        assert!(!app.has_dialog());
    }

    #[test]
    fn test_mode_locked_while_logged_in() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        login(&mut app, "pw");

        app.toggle_mode();
        assert!(!app.has_dialog());
        assert_eq!(app.mode, TradingMode::Simulation);
    }

    #[test]
    fn test_filter_switch_while_logged_in() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        login(&mut app, "pw");

        app.select_filter(AccountTypeFilter::DerivativesOnly);
        assert_eq!(app.filter, AccountTypeFilter::DerivativesOnly);
        let visible: Vec<_> = app
            .account_details()
            .into_iter()
            .filter(|d| d.visible)
            .map(|d| d.account_id)
            .collect();
        assert_eq!(visible, vec!["F1"]);
    }

    #[test]
    fn test_set_selected_default() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        login(&mut app, "pw");

        app.select_next_account();
        app.set_selected_default();
        let details = app.account_details();
        assert!(details[1].is_default);
        assert!(!details[0].is_default);
    }

    #[test]
    fn test_quit_while_logged_in_logs_out_first() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        login(&mut app, "pw");

        app.request_quit();
        assert!(!app.should_quit);
        assert_eq!(app.active_dialog, ActiveDialog::Confirm(Confirmation::Quit));

        app.close_dialog();
        app.confirm_quit();
        wait_idle(&mut app);
        assert!(app.should_quit);
        assert!(!app.is_connected());
    }

    #[test]
    fn test_quit_when_logged_out() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        app.request_quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_log_is_bounded() {
        let temp = TempDir::new().unwrap();
        let mut app = app(temp.path());
        for i in 0..(LOG_CAPACITY + 10) {
            app.push_log(format!("line {}", i));
        }
        assert_eq!(app.log.len(), LOG_CAPACITY);
        app.clear_log();
        assert!(app.log.is_empty());
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(Focus::UserId.next(), Focus::Password);
        assert_eq!(Focus::Accounts.next(), Focus::UserId);
        assert_eq!(Focus::UserId.previous(), Focus::Accounts);
        assert!(Focus::Password.is_text());
        assert!(!Focus::Mode.is_text());
    }
}
