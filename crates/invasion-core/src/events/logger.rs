//! Event Logger
//!
//! Append-only JSONL event logging.

use invasion_events::{generate_event_id, InvasionEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::invasion::{Battle, Conclusion};

/// Writes invasion events to a JSONL file
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a logger that discards events
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &InvasionEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn log_battle(&mut self, round: u32, battle: &Battle) -> std::io::Result<()> {
        let event = InvasionEvent::Battle {
            event_id: self.next_id(),
            round,
            location: battle.name.clone(),
            agents: battle.agents.iter().map(|a| a.to_string()).collect(),
        };
        self.log(&event)
    }

    pub fn log_conclusion(&mut self, round: u32, conclusion: &Conclusion) -> std::io::Result<()> {
        let event = InvasionEvent::Concluded {
            event_id: self.next_id(),
            round,
            outcome: conclusion.outcome(),
        };
        self.log(&event)
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush event logger: {}", e);
        }
    }
}
