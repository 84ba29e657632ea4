//! # Quorum Gate - Weighted Executive Consensus
//!
//! Guards privileged operations behind a vote of three executives:
//! - **Consensus**: one in-flight request, weighted votes, tiered quorum
//! - **Action**: applicant-only execution into a target system
//! - **Roles**: executive seats and advisory role membership
//! - **Events**: notifications on every lifecycle transition
//!
//! ## Quick Start
//!
//! ```rust
//! use quorum_gate::action::{ActionContext, ActionOutcome, ActionRegistry};
//! use quorum_gate::consensus::{ActionKind, ConsensusStatus, Request};
//! use quorum_gate::Management;
//!
//! fn accept(_ctx: &ActionContext<'_>) -> ActionOutcome {
//!     ActionOutcome::empty()
//! }
//!
//! let handlers = ActionKind::ALL
//!     .into_iter()
//!     .filter(|kind| kind.dispatches_to_target())
//!     .fold(ActionRegistry::new(), |registry, kind| registry.with_handler(kind, accept));
//!
//! let mut gate = Management::builder("cto", "ceo", "coo")
//!     .handlers(handlers)
//!     .build()
//!     .unwrap();
//!
//! // The CEO opens an approval; the COO's vote reaches 68 > 60.
//! let request = Request::new(1, ActionKind::Approve).with_target("spender").with_amount(5);
//! let id = gate.start_consensus(&"ceo".into(), request).unwrap();
//! gate.vote_consensus(&"coo".into(), &id, true).unwrap();
//! assert_eq!(gate.consensus_status(&id), Some(ConsensusStatus::Accepted));
//!
//! gate.run_action(&"ceo".into(), &id, &[], &[]).unwrap();
//! ```

pub mod action;
pub mod config;
pub mod consensus;
pub mod core;
pub mod events;
pub mod management;
pub mod roles;

pub use config::ManagementConfig;
pub use core::error::{Error, Result};
pub use management::{Management, ManagementBuilder, SharedManagement};
