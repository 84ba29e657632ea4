//! Requests and the action kinds they authorize.

use crate::consensus::QuorumTier;
use crate::core::{keccak256, Hash256, Identity};
use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// Category of privileged operation a request authorizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    GrantRole,
    RevokeRole,
    Mint,
    Burn,
    PauseAll,
    UnpauseAll,
    Transfer,
    ChangeRole,
    Freeze,
    Unfreeze,
    Pause,
    Unpause,
    Approve,
    WithdrawalBalance,
}

impl ActionKind {
    /// Every action kind.
    pub const ALL: [ActionKind; 14] = [
        ActionKind::GrantRole,
        ActionKind::RevokeRole,
        ActionKind::Mint,
        ActionKind::Burn,
        ActionKind::PauseAll,
        ActionKind::UnpauseAll,
        ActionKind::Transfer,
        ActionKind::ChangeRole,
        ActionKind::Freeze,
        ActionKind::Unfreeze,
        ActionKind::Pause,
        ActionKind::Unpause,
        ActionKind::Approve,
        ActionKind::WithdrawalBalance,
    ];

    /// Quorum tier that decides requests of this kind.
    pub fn tier(&self) -> QuorumTier {
        match self {
            ActionKind::GrantRole
            | ActionKind::RevokeRole
            | ActionKind::Mint
            | ActionKind::Burn
            | ActionKind::PauseAll
            | ActionKind::UnpauseAll
            | ActionKind::Transfer
            | ActionKind::ChangeRole => QuorumTier::Full,
            ActionKind::Freeze | ActionKind::Unfreeze | ActionKind::Pause | ActionKind::Unpause => {
                QuorumTier::Max
            }
            ActionKind::Approve | ActionKind::WithdrawalBalance => QuorumTier::GreaterThan60,
        }
    }

    /// Whether this kind reassigns an executive role.
    pub fn is_role_change(&self) -> bool {
        matches!(self, ActionKind::ChangeRole)
    }

    /// Whether executing this kind calls into the target system.
    ///
    /// Everything except ChangeRole does; ChangeRole only touches the local
    /// role registry.
    pub fn dispatches_to_target(&self) -> bool {
        !self.is_role_change()
    }
}

/// An immutable request to perform one privileged operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Caller-chosen id, non-zero and never reused
    pub id: u32,
    /// What the request authorizes
    pub kind: ActionKind,
    /// First target account
    pub target1: Option<Identity>,
    /// Second target account
    pub target2: Option<Identity>,
    /// Role operand for role-changing kinds
    pub role: Role,
    /// Amount for value-moving kinds
    pub amount: u128,
}

impl Request {
    /// Create a request with no operands.
    pub fn new(id: u32, kind: ActionKind) -> Self {
        Self {
            id,
            kind,
            target1: None,
            target2: None,
            role: Role::none(),
            amount: 0,
        }
    }

    /// Set both target accounts.
    pub fn with_targets(mut self, target1: impl Into<Identity>, target2: impl Into<Identity>) -> Self {
        self.target1 = Some(target1.into());
        self.target2 = Some(target2.into());
        self
    }

    /// Set the first target account only.
    pub fn with_target(mut self, target1: impl Into<Identity>) -> Self {
        self.target1 = Some(target1.into());
        self
    }

    /// Set the role operand.
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the amount.
    pub fn with_amount(mut self, amount: u128) -> Self {
        self.amount = amount;
        self
    }
}

/// Public id of a consensus record.
///
/// Keccak-256 over the big-endian request id, so external parties can find
/// a record without learning anything beyond the id they submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsensusId(pub Hash256);

impl ConsensusId {
    /// Derive the record id for a request id.
    pub fn for_request(request_id: u32) -> Self {
        Self(keccak256(&request_id.to_be_bytes()))
    }

    /// The "no record" sentinel.
    pub fn zero() -> Self {
        Self(Hash256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl std::fmt::Display for ConsensusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ExecutiveRole;

    #[test]
    fn test_tier_table() {
        use ActionKind::*;
        for kind in [GrantRole, RevokeRole, Mint, Burn, PauseAll, UnpauseAll, Transfer, ChangeRole] {
            assert_eq!(kind.tier(), QuorumTier::Full, "{:?}", kind);
        }
        for kind in [Freeze, Unfreeze, Pause, Unpause] {
            assert_eq!(kind.tier(), QuorumTier::Max, "{:?}", kind);
        }
        for kind in [Approve, WithdrawalBalance] {
            assert_eq!(kind.tier(), QuorumTier::GreaterThan60, "{:?}", kind);
        }
    }

    #[test]
    fn test_only_change_role_stays_local() {
        let local: Vec<_> = ActionKind::ALL
            .iter()
            .filter(|k| !k.dispatches_to_target())
            .collect();
        assert_eq!(local, vec![&ActionKind::ChangeRole]);
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new(3, ActionKind::ChangeRole)
            .with_targets("coo", "newcomer")
            .with_role(ExecutiveRole::Coo);
        assert_eq!(request.target1, Some(Identity::new("coo")));
        assert_eq!(request.target2, Some(Identity::new("newcomer")));
        assert_eq!(request.role, ExecutiveRole::Coo.role());
        assert_eq!(request.amount, 0);
    }

    #[test]
    fn test_consensus_id_is_keccak_of_be_id() {
        let id = ConsensusId::for_request(1);
        assert_eq!(id.0, keccak256(&[0x00, 0x00, 0x00, 0x01]));
        assert_ne!(id, ConsensusId::for_request(2));
        assert!(!id.is_zero());
        assert!(ConsensusId::zero().is_zero());
    }

    #[test]
    fn test_action_kind_serde_name() {
        let json = serde_json::to_string(&ActionKind::WithdrawalBalance).unwrap();
        assert_eq!(json, "\"WITHDRAWAL_BALANCE\"");
    }
}
