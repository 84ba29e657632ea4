//! Executes or cancels accepted actions.

use crate::action::{ActionContext, ActionOutcome, ActionRegistry};
use crate::consensus::{ActionKind, ActionStatus, ConsensusEngine, ConsensusId, ConsensusStage, Request};
use crate::core::{Error, Identity, Result};
use crate::events::ConsensusEventKind;
use crate::roles::RoleRegistry;
use tracing::{info, warn};

/// Applicant-only follow-up for accepted records.
#[derive(Debug, Default, Clone)]
pub struct ActionExecutor {
    handlers: ActionRegistry,
}

impl ActionExecutor {
    pub fn new(handlers: ActionRegistry) -> Self {
        Self { handlers }
    }

    pub fn handlers(&self) -> &ActionRegistry {
        &self.handlers
    }

    /// Perform the accepted action.
    ///
    /// The record leaves the action stage whatever the target reports; the
    /// outcome is returned and echoed in the executed notification.
    pub fn run_action(
        &self,
        engine: &mut ConsensusEngine,
        caller: &Identity,
        id: &ConsensusId,
        param1: &[u8],
        param2: &[u8],
    ) -> Result<ActionOutcome> {
        let (request, applicant) = Self::pending_request(engine, caller, id)?;

        let outcome = if request.kind.is_role_change() {
            Self::change_role(engine.roles_mut(), &request)
        } else {
            let ctx = ActionContext {
                id,
                request: &request,
                applicant: &applicant,
                param1,
                param2,
            };
            match self.handlers.get(request.kind) {
                Some(handler) => handler.execute(&ctx),
                None => ActionOutcome::failed("no handler registered"),
            }
        };

        let now = engine.now();
        let record = engine.record_mut(id)?;
        record.action_status = ActionStatus::Success;

        info!(
            record_id = %id,
            kind = ?request.kind,
            succeeded = outcome.succeeded,
            "Action executed"
        );
        engine.emit(
            now,
            ConsensusEventKind::ActionExecuted {
                applicant,
                id: *id,
                kind: request.kind,
                status: ActionStatus::Success,
                payload: outcome.payload.clone(),
            },
        );
        Ok(outcome)
    }

    /// Drop the accepted action without performing it.
    ///
    /// The record stays ACCEPTED; only its action status moves to CANCELED.
    pub fn cancel_action(&self, engine: &mut ConsensusEngine, caller: &Identity, id: &ConsensusId) -> Result<()> {
        let (request, applicant) = Self::pending_request(engine, caller, id)?;

        let now = engine.now();
        let record = engine.record_mut(id)?;
        record.action_status = ActionStatus::Canceled;

        info!(record_id = %id, kind = ?request.kind, "Action canceled");
        engine.emit(
            now,
            ConsensusEventKind::ActionCanceled {
                applicant,
                id: *id,
                kind: request.kind,
            },
        );
        Ok(())
    }

    /// Validate caller and stage; return the request and applicant.
    fn pending_request(
        engine: &mut ConsensusEngine,
        caller: &Identity,
        id: &ConsensusId,
    ) -> Result<(Request, Identity)> {
        let record = engine.record_mut(id)?;
        if record.applicant != *caller {
            warn!(record_id = %id, caller = %caller, "Action call forbidden");
            return Err(Error::Forbidden(caller.clone()));
        }
        if record.stage() != ConsensusStage::ActionStage {
            return Err(Error::InvalidStage);
        }
        Ok((record.request.clone(), record.applicant.clone()))
    }

    /// Move an executive role from `target1` to `target2`.
    fn change_role(roles: &mut dyn RoleRegistry, request: &Request) -> ActionOutcome {
        debug_assert_eq!(request.kind, ActionKind::ChangeRole);
        let (from, to) = match (&request.target1, &request.target2) {
            (Some(from), Some(to)) => (from, to),
            _ => return ActionOutcome::failed("role change needs both accounts"),
        };
        if !roles.has_role(from, &request.role) {
            return ActionOutcome::failed("source account does not hold the role");
        }
        if roles.executive_role_of(to).is_some() {
            return ActionOutcome::failed("destination already holds an executive role");
        }

        roles.revoke_role(&request.role, from);
        roles.grant_role(request.role, to.clone());
        info!(role = %request.role, from = %from, to = %to, "Executive role moved");
        ActionOutcome::empty()
    }
}
