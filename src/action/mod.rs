//! Action Module
//!
//! Post-acceptance execution:
//! - Handler interface into the target system
//! - Action kind to handler registry
//! - Token-style target adapter
//! - Applicant-only run/cancel

pub mod executor;
pub mod handler;
pub mod registry;
pub mod target;

pub use executor::ActionExecutor;
pub use handler::{ActionContext, ActionHandler, ActionOutcome};
pub use registry::ActionRegistry;
pub use target::{TargetHandler, TokenOperations};
