//! Session status and journal formatting

use crate::journal::JournalEntry;
use crate::session::{AccountTypeCounts, SessionStatus};

/// Format account counts as `Equities: 2  Derivatives: 1  Total: 3`
pub fn format_counts(counts: &AccountTypeCounts) -> String {
    format!(
        "Equities: {}  Derivatives: {}  Total: {}",
        counts.equities, counts.derivatives, counts.total
    )
}

/// Format the aggregate session status
pub fn format_session_status(status: &SessionStatus) -> String {
    let mut output = String::new();

    output.push_str("Session Status\n");
    output.push_str("==============\n");
    output.push_str(&format!("  Mode:           {}\n", status.mode));
    output.push_str(&format!(
        "  Logged in:      {}\n",
        if status.authenticated { "Yes" } else { "No" }
    ));
    if let Some(id) = status.session_id {
        output.push_str(&format!("  Session:        {}\n", id));
    }

    if status.authenticated {
        output.push_str(&format!("  Showing:        {}\n", status.filter));
        output.push_str(&format!("  Visible:        {}\n", status.visible_count));
        output.push_str(&format!("  Accounts:       {}\n", format_counts(&status.counts)));
        output.push_str(&format!(
            "  Default EQ:     {}\n",
            if status.has_default_equities { "Set" } else { "None" }
        ));
        output.push_str(&format!(
            "  Default FO:     {}\n",
            if status.has_default_derivatives { "Set" } else { "None" }
        ));
    }

    output.push_str(&format!("  Contracts:      {}\n", status.contracts_status));
    output
}

/// Format journal entries, oldest first
pub fn format_journal(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "Journal is empty.".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        let session = entry
            .session_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{}  {:<12}  {:<5}  {}\n",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            session,
            entry.level().to_string(),
            entry.event.message()
        ));
    }
    output
}
