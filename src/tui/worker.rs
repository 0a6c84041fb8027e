//! Background session worker
//!
//! Login and logout can block on the brokerage for seconds, so they run on a
//! worker thread. The worker takes ownership of the `SessionManager` for the
//! duration of the call and hands it back with the outcome; the UI thread
//! never touches the manager while a worker holds it.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use zeroize::Zeroizing;

use crate::models::AccountTypeFilter;
use crate::session::SessionManager;

/// What a worker was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerTask {
    Login,
    Logout,
}

impl WorkerTask {
    pub fn in_progress_label(&self) -> &'static str {
        match self {
            Self::Login => "Logging in...",
            Self::Logout => "Logging out...",
        }
    }
}

/// Result of one worker run, carrying the manager back
pub struct WorkerOutcome {
    pub task: WorkerTask,
    pub success: bool,
    pub manager: SessionManager,
}

/// Log in on a background thread
pub fn spawn_login(
    mut manager: SessionManager,
    user_id: String,
    secret: Zeroizing<String>,
    filter: AccountTypeFilter,
    results: Sender<WorkerOutcome>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let success = manager.login(&user_id, &secret, filter);
        drop(secret);
        // The UI may already be gone; the manager then drops here and releases itself.
        let _ = results.send(WorkerOutcome {
            task: WorkerTask::Login,
            success,
            manager,
        });
    })
}

/// Log out on a background thread
pub fn spawn_logout(mut manager: SessionManager, results: Sender<WorkerOutcome>) -> JoinHandle<()> {
    thread::spawn(move || {
        let success = manager.logout();
        let _ = results.send(WorkerOutcome {
            task: WorkerTask::Logout,
            success,
            manager,
        });
    })
}
