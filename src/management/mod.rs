//! Management Module
//!
//! Public surface of the quorum gate:
//! - Builder wiring config, executives, handlers, clock and event sink
//! - Facade over the consensus engine and action executor
//! - Lock-serialized async handle for concurrent callers

pub mod gate;
pub mod shared;

pub use gate::{Management, ManagementBuilder};
pub use shared::SharedManagement;
