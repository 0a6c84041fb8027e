use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kgi_trader::cli::{
    apply_fixture_override, build_manager, cli_sink, handle_config_command,
    handle_journal_command, handle_login_command, handle_status_command, print_banner,
    InteractiveShell, SessionContext,
};
use kgi_trader::config::{Settings, TraderPaths};
use kgi_trader::models::AccountTypeFilter;
use kgi_trader::tui::{run_tui, App};

#[derive(Parser)]
#[command(
    name = "kgi",
    version,
    about = "Session and account manager for KGI brokerage accounts",
    long_about = "Logs in to a KGI brokerage account through the vendor SDK bridge \
                  (or an offline roster), lists the Equities and Derivatives accounts \
                  of the session and manages the default account of each type."
)]
struct Cli {
    /// Use the real trading environment instead of the simulation
    #[arg(long, global = true)]
    production: bool,

    /// Serve logins from a JSON roster instead of the SDK bridge
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    /// Log filter, e.g. "info" or "kgi_trader=debug" (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Account type to show after login (all, equities, derivatives)
    #[arg(long, global = true, value_parser = parse_filter)]
    filter: Option<AccountTypeFilter>,

    /// Brokerage user id
    #[arg(long, global = true, env = "KGI_USER_ID")]
    user_id: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login, list accounts and status, then logout
    Login,

    /// Numbered menu over one session
    #[command(alias = "menu")]
    Interactive,

    /// Show session status (logs in first when a user id is given)
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent session journal entries
    Journal {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,

    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,
}

fn parse_filter(s: &str) -> Result<AccountTypeFilter, String> {
    AccountTypeFilter::parse(s)
        .ok_or_else(|| format!("unknown account type '{}' (use all, equities or derivatives)", s))
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the screen; its events go to the log panel instead.
    if !matches!(cli.command, Some(Commands::Tui)) {
        init_tracing(cli.log_level.as_deref());
    }

    let paths = TraderPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    apply_fixture_override(&mut settings, cli.fixture);

    let ctx = SessionContext::resolve(&settings, cli.production, cli.filter, cli.user_id);

    match cli.command {
        Some(Commands::Login) => {
            print_banner(ctx.mode);
            let mut manager = build_manager(&settings, ctx.mode, Box::new(cli_sink(&paths, &settings)));
            let result = handle_login_command(&mut manager, &ctx);
            manager.shutdown();
            result?;
            println!("Application terminated.");
        }
        Some(Commands::Interactive) => {
            print_banner(ctx.mode);
            let mut manager = build_manager(&settings, ctx.mode, Box::new(cli_sink(&paths, &settings)));
            let stdin = std::io::stdin();
            let result =
                InteractiveShell::new(&mut manager, &ctx, stdin.lock(), std::io::stdout()).run();
            if manager.is_connected() {
                println!("Logging out...");
            }
            manager.shutdown();
            result?;
            println!("Application terminated.");
        }
        Some(Commands::Status { json }) => {
            let mut manager = build_manager(&settings, ctx.mode, Box::new(cli_sink(&paths, &settings)));
            let result = handle_status_command(&mut manager, &ctx, json);
            manager.shutdown();
            result?;
        }
        Some(Commands::Journal { limit }) => {
            handle_journal_command(&paths, limit)?;
        }
        Some(Commands::Config) => {
            handle_config_command(&paths, &settings)?;
        }
        Some(Commands::Tui) => {
            let app = App::new(settings, Some(paths), ctx.mode, ctx.filter, ctx.user_id);
            run_tui(app)?;
        }
        None => {
            println!("kgi - KGI brokerage session manager");
            println!();
            println!("Run 'kgi --help' for usage information.");
            println!("Run 'kgi interactive' for the menu, or 'kgi tui' for the full-screen interface.");
        }
    }

    Ok(())
}
