//! Roles Module
//!
//! Who may vote and with how much weight:
//! - Keccak-derived role ids and the three executive roles
//! - Static executive weight table
//! - Role membership registry

pub mod registry;
pub mod role;
pub mod weights;

pub use registry::{AccessControl, RoleRegistry};
pub use role::{ExecutiveRole, Role};
pub use weights::{RoleWeightTable, TOTAL_WEIGHT};
