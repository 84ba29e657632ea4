//! Consensus Module
//!
//! Weighted executive quorum over a single in-flight request:
//! - Request ledger with permanent id reservation
//! - Full / GreaterThan60 / Max decision tiers
//! - Consensus record with derived stage
//! - Engine driving start, vote, cancel and expiry

pub mod engine;
pub mod ledger;
pub mod quorum;
pub mod record;
pub mod request;

pub use engine::ConsensusEngine;
pub use ledger::RequestLedger;
pub use quorum::{QuorumDecision, QuorumTier, TallySnapshot, SUPER_MAJORITY};
pub use record::{ActionStatus, ConsensusRecord, ConsensusStage, ConsensusStatus};
pub use request::{ActionKind, ConsensusId, Request};
