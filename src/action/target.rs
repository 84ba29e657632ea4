//! Adapter from a token-style target system to per-kind handlers.
//!
//! Implement [`TokenOperations`] once and [`ActionRegistry::for_target`]
//! wires every target-dispatched kind to the matching call.

use crate::action::{ActionContext, ActionHandler, ActionOutcome, ActionRegistry};
use crate::consensus::ActionKind;
use crate::core::Identity;
use crate::roles::Role;
use std::sync::Arc;

/// Operations the target system exposes, one per action kind.
pub trait TokenOperations: Send + Sync {
    fn grant_role(&self, role: &Role, account: &Identity) -> ActionOutcome;
    fn revoke_role(&self, role: &Role, account: &Identity) -> ActionOutcome;
    fn mint(&self, to: &Identity, amount: u128) -> ActionOutcome;
    fn burn(&self, from: &Identity, amount: u128) -> ActionOutcome;
    fn pause_all(&self) -> ActionOutcome;
    fn unpause_all(&self) -> ActionOutcome;
    fn transfer(&self, to: &Identity, amount: u128) -> ActionOutcome;
    fn freeze(&self, account: &Identity, amount: u128) -> ActionOutcome;
    fn unfreeze(&self, account: &Identity, amount: u128) -> ActionOutcome;
    fn pause(&self, account: &Identity) -> ActionOutcome;
    fn unpause(&self, account: &Identity) -> ActionOutcome;
    fn approve(&self, spender: &Identity, amount: u128) -> ActionOutcome;
    fn withdraw_balance(&self, to: &Identity) -> ActionOutcome;
}

/// Handler that forwards one action kind to a [`TokenOperations`] target.
pub struct TargetHandler {
    kind: ActionKind,
    target: Arc<dyn TokenOperations>,
}

impl TargetHandler {
    pub fn new(kind: ActionKind, target: Arc<dyn TokenOperations>) -> Self {
        Self { kind, target }
    }
}

impl ActionHandler for TargetHandler {
    fn execute(&self, ctx: &ActionContext<'_>) -> ActionOutcome {
        let request = ctx.request;
        let target = self.target.as_ref();

        let account = match self.kind {
            ActionKind::PauseAll => return target.pause_all(),
            ActionKind::UnpauseAll => return target.unpause_all(),
            _ => match ctx.target1() {
                Some(account) => account,
                None => return ActionOutcome::failed("request names no target account"),
            },
        };

        match self.kind {
            ActionKind::GrantRole => target.grant_role(&request.role, account),
            ActionKind::RevokeRole => target.revoke_role(&request.role, account),
            ActionKind::Mint => target.mint(account, request.amount),
            ActionKind::Burn => target.burn(account, request.amount),
            ActionKind::Transfer => target.transfer(account, request.amount),
            ActionKind::Freeze => target.freeze(account, request.amount),
            ActionKind::Unfreeze => target.unfreeze(account, request.amount),
            ActionKind::Pause => target.pause(account),
            ActionKind::Unpause => target.unpause(account),
            ActionKind::Approve => target.approve(account, request.amount),
            ActionKind::WithdrawalBalance => target.withdraw_balance(account),
            ActionKind::PauseAll | ActionKind::UnpauseAll | ActionKind::ChangeRole => {
                ActionOutcome::failed("action is not dispatched to the target")
            }
        }
    }
}

impl ActionRegistry {
    /// Registry with every target-dispatched kind bound to `target`.
    pub fn for_target(target: Arc<dyn TokenOperations>) -> Self {
        let mut registry = Self::new();
        for kind in ActionKind::ALL.into_iter().filter(|k| k.dispatches_to_target()) {
            registry.register(kind, Arc::new(TargetHandler::new(kind, target.clone())));
        }
        registry
    }
}
