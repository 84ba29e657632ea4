//! Event sinks.

use crate::events::{ConsensusEvent, ConsensusEventKind};
use std::sync::RwLock;

/// Receiver of lifecycle notifications.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ConsensusEvent);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ConsensusEvent) {}
}

/// Bounded in-memory event buffer.
#[derive(Debug)]
pub struct EventLog {
    buffer: RwLock<Vec<ConsensusEvent>>,
    max_buffer: usize,
}

impl EventLog {
    /// Create a log holding at most `max_buffer` events.
    pub fn new(max_buffer: usize) -> Self {
        Self {
            buffer: RwLock::new(Vec::new()),
            max_buffer: max_buffer.max(1),
        }
    }

    /// All buffered events, oldest first.
    pub fn events(&self) -> Vec<ConsensusEvent> {
        self.buffer.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Buffered event kinds, oldest first.
    pub fn kinds(&self) -> Vec<ConsensusEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<ConsensusEvent> {
        self.buffer.read().ok().and_then(|b| b.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.buffer.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every buffered event.
    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.write() {
            buffer.clear();
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: ConsensusEvent) {
        if let Ok(mut buffer) = self.buffer.write() {
            if buffer.len() >= self.max_buffer {
                buffer.remove(0);
            }
            buffer.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{ActionKind, ConsensusId};

    fn started(request_id: u32) -> ConsensusEvent {
        ConsensusEvent::now(ConsensusEventKind::ConsensusStarted {
            applicant: "cto".into(),
            id: ConsensusId::for_request(request_id),
            kind: ActionKind::Mint,
        })
    }

    #[test]
    fn test_event_log_records_in_order() {
        let log = EventLog::default();
        log.emit(started(1));
        log.emit(started(2));

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.last().unwrap().kind.consensus_id(),
            &ConsensusId::for_request(2)
        );
    }

    #[test]
    fn test_event_log_is_bounded() {
        let log = EventLog::new(2);
        for id in 1..=3 {
            log.emit(started(id));
        }
        let ids: Vec<_> = log.kinds().iter().map(|k| *k.consensus_id()).collect();
        assert_eq!(ids, vec![ConsensusId::for_request(2), ConsensusId::for_request(3)]);
    }

    #[test]
    fn test_clear() {
        let log = EventLog::default();
        log.emit(started(1));
        log.clear();
        assert!(log.is_empty());
        NullSink.emit(started(1));
    }
}
