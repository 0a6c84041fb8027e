//! Event handling for the TUI
//!
//! This module handles terminal events (key presses, resize) using
//! crossterm's event system, plus a periodic tick used to drain the
//! session log and worker queues.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Interval at which queued session events are drained
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Terminal events
#[derive(Debug, Clone)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

/// Event handler for terminal events
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                // A terminal read error ends the thread; the UI sees a closed channel.
                match event::poll(timeout) {
                    Ok(true) => {
                        let sent = match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                sender.send(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Resize(width, height)) => {
                                sender.send(Event::Resize(width, height))
                            }
                            Ok(_) => Ok(()),
                            Err(_) => return,
                        };
                        if sent.is_err() {
                            return;
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return,
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { receiver }
    }

    /// Get the next event (blocking)
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}
