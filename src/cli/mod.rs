//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the session core.

pub mod interactive;
pub mod journal;
pub mod session;

pub use interactive::{InteractiveShell, MenuChoice};
pub use journal::{handle_config_command, handle_journal_command};
pub use session::{
    apply_fixture_override, build_manager, cli_sink, handle_login_command, handle_status_command,
    print_banner, read_secret, SessionContext, PASSWORD_ENV,
};
