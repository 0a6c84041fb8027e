//! Event sinks
//!
//! A `SessionManager` owns exactly one `EventSink`, handed to it at
//! construction. Front ends choose where events go; the library never
//! installs process-wide logging state of its own.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use super::event::{EventLevel, JournalEntry, SessionEvent};

/// Destination for session events
pub trait EventSink: Send {
    fn record(&self, entry: &JournalEntry);
}

/// Forwards events to `tracing` with structured fields
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, entry: &JournalEntry) {
        let session = entry
            .session_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let message = entry.event.message();

        if let SessionEvent::AccountDiscovered {
            kind,
            owner_id,
            broker_id,
            account_id,
            signed,
            trader,
            ..
        } = &entry.event
        {
            info!(
                session = %session,
                event = entry.event.name(),
                kind = %kind,
                owner_id = %owner_id,
                broker_id = %broker_id,
                account_id = %account_id,
                signed = *signed,
                trader = trader.as_deref().unwrap_or(""),
                "{}",
                message
            );
            return;
        }

        match entry.level() {
            EventLevel::Info => info!(session = %session, event = entry.event.name(), "{}", message),
            EventLevel::Warn => warn!(session = %session, event = entry.event.name(), "{}", message),
            EventLevel::Error => error!(session = %session, event = entry.event.name(), "{}", message),
        }
    }
}

/// Sends rendered log lines to another thread
///
/// The receiving end is typically a UI thread polling on a short tick.
pub struct ChannelSink {
    sender: Mutex<Sender<String>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<String>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl EventSink for ChannelSink {
    fn record(&self, entry: &JournalEntry) {
        if let Ok(sender) = self.sender.lock() {
            // A closed receiver just means nobody is watching any more.
            let _ = sender.send(entry.render_line());
        }
    }
}

/// Collects events in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded entry
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Snapshot of every recorded event
    pub fn events(&self) -> Vec<SessionEvent> {
        self.entries().into_iter().map(|e| e.event).collect()
    }

    /// Number of recorded events with the given name
    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSink for MemorySink {
    fn record(&self, entry: &JournalEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

/// Delivers every event to several sinks, in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn record(&self, entry: &JournalEntry) {
        for sink in &self.sinks {
            sink.record(entry);
        }
    }
}
