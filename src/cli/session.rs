//! Session CLI commands
//!
//! Builds a `SessionManager` from settings and flags, collects credentials and
//! runs the non-interactive login demo and status commands.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::broker::connector_from_settings;
use crate::config::{Settings, TraderPaths};
use crate::display::{format_account_details, format_session_status, format_visible_accounts};
use crate::error::{TraderError, TraderResult};
use crate::journal::{EventSink, FanoutSink, JournalSink, TracingSink};
use crate::models::{AccountTypeFilter, TradingMode};
use crate::session::SessionManager;

/// Environment variable holding the login secret
pub const PASSWORD_ENV: &str = "KGI_PASSWORD";

/// Session options resolved from global flags and settings
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub mode: TradingMode,
    pub filter: AccountTypeFilter,
    pub user_id: Option<String>,
}

impl SessionContext {
    /// Resolve flags against settings
    ///
    /// Production is used only when asked for, by flag or by settings.
    pub fn resolve(
        settings: &Settings,
        production: bool,
        filter: Option<AccountTypeFilter>,
        user_id: Option<String>,
    ) -> Self {
        let mode = if production {
            TradingMode::Production
        } else {
            settings.default_mode
        };
        Self {
            mode,
            filter: filter.unwrap_or(settings.default_filter),
            user_id: user_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Apply `--fixture` on top of the stored settings
pub fn apply_fixture_override(settings: &mut Settings, fixture: Option<PathBuf>) {
    if let Some(path) = fixture {
        settings.fixture_file = Some(path);
    }
}

/// Sink used by the line-oriented front end
///
/// Events always go to `tracing`; the journal file is added when enabled.
pub fn cli_sink(paths: &TraderPaths, settings: &Settings) -> FanoutSink {
    let mut sink = FanoutSink::new().with(TracingSink);
    if settings.journal_enabled && paths.ensure_directories().is_ok() {
        sink = sink.with(JournalSink::new(paths.journal_file()));
    }
    sink
}

/// Build a logged-out manager for `mode`
pub fn build_manager(
    settings: &Settings,
    mode: TradingMode,
    sink: Box<dyn EventSink>,
) -> SessionManager {
    SessionManager::new(mode, connector_from_settings(settings), sink)
        .with_login_options(settings.login_options())
}

/// Read a trimmed line after printing `prompt`
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> TraderResult<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Secret from `KGI_PASSWORD`, or a hidden prompt
pub fn read_secret() -> TraderResult<Zeroizing<String>> {
    if let Ok(secret) = std::env::var(PASSWORD_ENV) {
        return Ok(Zeroizing::new(secret));
    }
    rpassword::prompt_password("Enter Password: ")
        .map(Zeroizing::new)
        .map_err(|e| TraderError::Io(format!("Failed to read password: {}", e)))
}

/// Print the banner shown before every session command
pub fn print_banner(mode: TradingMode) {
    println!("{}", "=".repeat(60));
    println!("    KGI Securities Trading Application");
    println!("    Account Session Manager");
    println!("{}", "=".repeat(60));
    println!("Mode: {}", mode);
    println!();
}

fn require_user_id(ctx: &SessionContext) -> TraderResult<&str> {
    ctx.user_id.as_deref().ok_or_else(|| {
        TraderError::Validation(
            "User ID required for non-interactive mode (use --user-id or KGI_USER_ID)".into(),
        )
    })
}

/// Login, print the accounts and status, then log out
pub fn handle_login_command(manager: &mut SessionManager, ctx: &SessionContext) -> TraderResult<()> {
    let user_id = require_user_id(ctx)?;
    let secret = read_secret()?;

    println!("Attempting to login with user ID: {}", user_id);
    if !manager.login(user_id, &secret, ctx.filter) {
        return Err(TraderError::Authentication(
            "Login failed. Please check your credentials.".into(),
        ));
    }
    println!("Login successful!");
    println!();

    let visible = manager.list_visible_accounts();
    println!("{} ({} accounts):", manager.filter(), visible.len());
    print!("{}", format_visible_accounts(&visible));
    println!();
    print!("{}", format_account_details(&manager.list_all_account_details()));
    println!();
    print!("{}", format_session_status(&manager.session_status()));
    println!();

    println!("Logging out...");
    if manager.logout() {
        println!("Logout successful!");
    }
    Ok(())
}

/// Print the session status, logging in first when a user id is known
pub fn handle_status_command(
    manager: &mut SessionManager,
    ctx: &SessionContext,
    json: bool,
) -> TraderResult<()> {
    if let Some(user_id) = ctx.user_id.as_deref() {
        let secret = read_secret()?;
        if !manager.login(user_id, &secret, ctx.filter) {
            return Err(TraderError::Authentication("Login failed".into()));
        }
    }

    let status = manager.session_status();
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", format_session_status(&status));
    }

    if manager.is_connected() {
        manager.logout();
    }
    Ok(())
}

/// Read user id and secret, prompting for whatever is missing
pub fn collect_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    user_id: Option<&str>,
) -> TraderResult<Option<(String, Zeroizing<String>)>> {
    let user_id = match user_id {
        Some(id) => id.to_string(),
        None => match prompt_line(input, output, "Enter User ID: ")? {
            Some(id) => id,
            None => return Ok(None),
        },
    };
    if user_id.is_empty() {
        writeln!(output, "User ID cannot be empty.")?;
        return Ok(None);
    }

    let secret = read_secret()?;
    if secret.is_empty() {
        writeln!(output, "Password cannot be empty.")?;
        return Ok(None);
    }
    Ok(Some((user_id, secret)))
}
