//! Role identifiers.
//!
//! A role is the Keccak-256 digest of its name, so the same name always maps
//! to the same 32-byte id across deployments.

use crate::core::{keccak256, Hash256};
use serde::{Deserialize, Serialize};

/// An opaque role identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub Hash256);

impl Role {
    /// Derive a role id from its name, e.g. `"ADMIN_ROLE"`.
    pub fn from_name(name: &str) -> Self {
        Self(keccak256(name.as_bytes()))
    }

    /// The empty role, used by requests that carry no role.
    pub fn none() -> Self {
        Self(Hash256::zero())
    }

    /// Whether this is the empty role.
    pub fn is_none(&self) -> bool {
        self.0.is_zero()
    }

    /// Raw 32-byte id.
    pub fn id(&self) -> &Hash256 {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match ExecutiveRole::from_role(self) {
            Some(exec) => write!(f, "{}", exec.name()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// One of the three voting principals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutiveRole {
    Cto,
    Ceo,
    Coo,
}

impl ExecutiveRole {
    /// All executive roles, in the order holders are resolved.
    pub const ALL: [ExecutiveRole; 3] = [ExecutiveRole::Cto, ExecutiveRole::Ceo, ExecutiveRole::Coo];

    /// Canonical role name.
    pub fn name(&self) -> &'static str {
        match self {
            ExecutiveRole::Cto => "CTO_ROLE",
            ExecutiveRole::Ceo => "CEO_ROLE",
            ExecutiveRole::Coo => "COO_ROLE",
        }
    }

    /// The role id this executive role is stored under.
    pub fn role(&self) -> Role {
        Role::from_name(self.name())
    }

    /// Map a role id back to an executive role, if it is one.
    pub fn from_role(role: &Role) -> Option<Self> {
        Self::ALL.into_iter().find(|exec| exec.role() == *role)
    }
}

impl From<ExecutiveRole> for Role {
    fn from(exec: ExecutiveRole) -> Self {
        exec.role()
    }
}
