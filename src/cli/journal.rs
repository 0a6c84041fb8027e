//! Journal and configuration CLI commands

use crate::config::{Settings, TraderPaths};
use crate::display::format_journal;
use crate::error::TraderResult;
use crate::journal::JournalSink;

/// Print the most recent `limit` journal entries
pub fn handle_journal_command(paths: &TraderPaths, limit: usize) -> TraderResult<()> {
    let journal = JournalSink::new(paths.journal_file());
    let total = journal.entry_count()?;
    let entries = journal.read_recent(limit)?;

    println!("Session Journal ({} of {} entries)", entries.len(), total);
    println!("Location: {}", journal.path().display());
    println!();
    print!("{}", format_journal(&entries));
    if entries.is_empty() {
        println!();
    }
    Ok(())
}

/// Print paths and effective settings
pub fn handle_config_command(paths: &TraderPaths, settings: &Settings) -> TraderResult<()> {
    println!("KGI Trader Configuration");
    println!("========================");
    println!("Data directory: {}", paths.base_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Journal file:   {}", paths.journal_file().display());
    println!();
    println!("Settings:");
    println!("  Default mode:      {}", settings.default_mode);
    println!("  Default filter:    {}", settings.default_filter);
    match &settings.fixture_file {
        Some(path) => println!("  Broker:            fixture roster {}", path.display()),
        None => println!("  Broker:            bridge at {}", settings.bridge_url),
    }
    println!("  Request timeout:   {}s", settings.request_timeout_secs);
    println!(
        "  Fetch contracts:   {} (timeout {} ms)",
        settings.fetch_contract, settings.contracts_timeout_ms
    );
    println!("  Subscribe trades:  {}", settings.subscribe_trade);
    println!("  Receive window:    {} ms", settings.receive_window_ms);
    println!("  Journal enabled:   {}", settings.journal_enabled);
    Ok(())
}
