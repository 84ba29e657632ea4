//! Role registry.
//!
//! Maps identities to held roles. The gate reads it to authorize voters and
//! writes it only when an accepted ChangeRole request is executed.

use crate::core::Identity;
use crate::roles::{ExecutiveRole, Role};
use std::collections::{BTreeSet, HashMap};

/// Role membership store.
pub trait RoleRegistry: Send + Sync {
    /// Whether `identity` holds `role`.
    fn has_role(&self, identity: &Identity, role: &Role) -> bool;

    /// Grant `role` to `identity`. Returns `false` if it was already held.
    fn grant_role(&mut self, role: Role, identity: Identity) -> bool;

    /// Revoke `role` from `identity`. Returns `false` if it was not held.
    fn revoke_role(&mut self, role: &Role, identity: &Identity) -> bool;

    /// Current holders of `role`.
    fn holders(&self, role: &Role) -> Vec<Identity>;

    /// The executive role `identity` votes with, if any.
    fn executive_role_of(&self, identity: &Identity) -> Option<ExecutiveRole> {
        ExecutiveRole::ALL
            .into_iter()
            .find(|exec| self.has_role(identity, &exec.role()))
    }
}

/// In-memory access control list.
#[derive(Clone, Debug, Default)]
pub struct AccessControl {
    members: HashMap<Role, BTreeSet<Identity>>,
}

impl AccessControl {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the three executive seats filled.
    pub fn with_executives(cto: Identity, ceo: Identity, coo: Identity) -> Self {
        let mut acl = Self::new();
        acl.grant_role(ExecutiveRole::Cto.role(), cto);
        acl.grant_role(ExecutiveRole::Ceo.role(), ceo);
        acl.grant_role(ExecutiveRole::Coo.role(), coo);
        acl
    }

    /// Number of distinct roles with at least one holder.
    pub fn role_count(&self) -> usize {
        self.members.values().filter(|m| !m.is_empty()).count()
    }
}

impl RoleRegistry for AccessControl {
    fn has_role(&self, identity: &Identity, role: &Role) -> bool {
        self.members
            .get(role)
            .map(|m| m.contains(identity))
            .unwrap_or(false)
    }

    fn grant_role(&mut self, role: Role, identity: Identity) -> bool {
        self.members.entry(role).or_default().insert(identity)
    }

    fn revoke_role(&mut self, role: &Role, identity: &Identity) -> bool {
        match self.members.get_mut(role) {
            Some(members) => members.remove(identity),
            None => false,
        }
    }

    fn holders(&self, role: &Role) -> Vec<Identity> {
        self.members
            .get(role)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }
}
