//! Session journal and event sinks
//!
//! # Architecture
//!
//! - `SessionEvent`: one state transition of the session core, with a level
//!   and a human-readable message.
//! - `JournalEntry`: a timestamped event tagged with the active session id.
//! - `EventSink`: where entries go. `TracingSink` feeds `tracing`,
//!   `JournalSink` appends JSONL to disk, `ChannelSink` hands rendered lines to
//!   a UI thread, `MemorySink` keeps them for inspection and `FanoutSink`
//!   combines several.
//!
//! # Example
//!
//! ```rust,ignore
//! use kgi_trader::journal::{FanoutSink, JournalSink, TracingSink};
//!
//! let sink = FanoutSink::new()
//!     .with(TracingSink)
//!     .with(JournalSink::new(paths.journal_file()));
//! let manager = SessionManager::new(mode, connector, Box::new(sink));
//! ```

mod event;
mod file;
mod sink;

pub use event::{EventLevel, JournalEntry, SessionEvent};
pub use file::JournalSink;
pub use sink::{ChannelSink, EventSink, FanoutSink, MemorySink, TracingSink};
