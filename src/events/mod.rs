//! Events Module
//!
//! Lifecycle notifications and the sinks that receive them.

pub mod event;
pub mod sink;

pub use event::{ConsensusEvent, ConsensusEventKind};
pub use sink::{EventLog, EventSink, NullSink};
