//! Event Sink Adapters
//!
//! `InMemoryEventLog` keeps published events for inspection;
//! `JsonLinesEventSink` writes one JSON object per event. A call's events are
//! encoded as one block and written with a single `write_all`.

use crate::domain::EventSinkError;
use crate::events::{EmittedEvent, RegistrarEvent};
use crate::ports::outbound::EventSink;
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Event log kept in memory.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<EmittedEvent>>,
    refusing: AtomicBool,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All published events, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.read().clone()
    }

    /// Payloads only, oldest first.
    pub fn payloads(&self) -> Vec<RegistrarEvent> {
        self.events.read().iter().map(|e| e.event.clone()).collect()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<EmittedEvent> {
        self.events.read().last().cloned()
    }

    /// Number of published events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drop all events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Make every later `publish` fail (or succeed again).
    pub fn refuse_publishing(&self, refuse: bool) {
        self.refusing.store(refuse, Ordering::SeqCst);
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, events: &[EmittedEvent]) -> Result<(), EventSinkError> {
        if self.refusing.load(Ordering::SeqCst) {
            return Err(EventSinkError::Write("event log refusing writes".to_string()));
        }
        self.events.write().extend_from_slice(events);
        Ok(())
    }
}

/// Writes each event as one line of JSON.
pub struct JsonLinesEventSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn publish(&self, events: &[EmittedEvent]) -> Result<(), EventSinkError> {
        let block = encode_lines(events)?;
        let mut writer = self.writer.lock();
        writer
            .write_all(&block)
            .and_then(|()| writer.flush())
            .map_err(|e| {
                warn!(events = events.len(), error = %e, "Failed to write events");
                EventSinkError::Write(e.to_string())
            })
    }
}

fn encode_lines(events: &[EmittedEvent]) -> Result<Vec<u8>, EventSinkError> {
    let mut block = Vec::new();
    for event in events {
        serde_json::to_writer(&mut block, event)
            .map_err(|e| EventSinkError::Encode(e.to_string()))?;
        block.push(b'\n');
    }
    Ok(block)
}
