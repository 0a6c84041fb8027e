//! Append-only session journal
//!
//! Each `JournalEntry` is written as a single JSON line and flushed
//! immediately, so the journal survives a crash mid-session.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::error::{TraderError, TraderResult};

use super::event::JournalEntry;
use super::sink::EventSink;

/// Writes session events to a JSONL file
pub struct JournalSink {
    /// Path to the journal file
    log_path: PathBuf,
}

impl JournalSink {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush
    pub fn append(&self, entry: &JournalEntry) -> TraderResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| TraderError::Io(format!("Failed to open session journal: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| TraderError::Json(format!("Failed to serialize journal entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| TraderError::Io(format!("Failed to write journal entry: {}", e)))?;

        file.flush()
            .map_err(|e| TraderError::Io(format!("Failed to flush session journal: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> TraderResult<Vec<JournalEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TraderError::Io(format!("Failed to open session journal: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                TraderError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line).map_err(|e| {
                TraderError::Json(format!(
                    "Failed to parse journal entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent `count` entries
    pub fn read_recent(&self, count: usize) -> TraderResult<Vec<JournalEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Number of non-empty lines in the journal
    pub fn entry_count(&self) -> TraderResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TraderError::Io(format!("Failed to open session journal: {}", e)))?;

        Ok(BufReader::new(file)
            .lines()
            .filter_map(|l| l.ok())
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl EventSink for JournalSink {
    fn record(&self, entry: &JournalEntry) {
        if let Err(e) = self.append(entry) {
            warn!(path = %self.log_path.display(), "session journal write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::event::SessionEvent;
    use crate::models::{AccountKind, SessionId};
    use tempfile::TempDir;

    fn create_test_journal() -> (JournalSink, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let journal = JournalSink::new(temp_dir.path().join("session.log"));
        (journal, temp_dir)
    }

    #[test]
    fn test_append_and_read() {
        let (journal, _temp) = create_test_journal();
        let session = SessionId::new();

        journal
            .append(&JournalEntry::new(
                Some(session),
                SessionEvent::DefaultAccountSet {
                    kind: AccountKind::Equities,
                    account_id: "S1".into(),
                },
            ))
            .unwrap();

        let entries = journal.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session_id, Some(session));
        assert_eq!(entries[0].event.name(), "default_account_set");
    }

    #[test]
    fn test_read_recent() {
        let (journal, _temp) = create_test_journal();

        for i in 0..10 {
            journal.record(&JournalEntry::new(
                None,
                SessionEvent::LoginFailed {
                    owner_id: format!("U{}", i),
                    reason: "no accounts returned".into(),
                },
            ));
        }

        assert_eq!(journal.entry_count().unwrap(), 10);
        let recent = journal.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent[0].event,
            SessionEvent::LoginFailed {
                owner_id: "U7".into(),
                reason: "no accounts returned".into()
            }
        );
    }

    #[test]
    fn test_empty_journal() {
        let (journal, _temp) = create_test_journal();
        assert_eq!(journal.entry_count().unwrap(), 0);
        assert!(journal.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_into_missing_directory_does_not_panic() {
        let journal = JournalSink::new(PathBuf::from("/nonexistent/dir/session.log"));
        journal.record(&JournalEntry::new(None, SessionEvent::LogoutSucceeded));
        assert!(journal.append(&JournalEntry::new(None, SessionEvent::LogoutSucceeded)).is_err());
    }

    #[test]
    fn test_survives_reopen() {
        let (journal, temp) = create_test_journal();
        journal.record(&JournalEntry::new(None, SessionEvent::LogoutSucceeded));

        let reopened = JournalSink::new(temp.path().join("session.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
