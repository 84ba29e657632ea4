//! The management facade.
//!
//! Bundles the consensus engine, the action executor and the role registry
//! behind one `&mut self` surface, so a single owner (or a single lock, see
//! [`SharedManagement`](crate::management::SharedManagement)) serializes
//! every mutation.

use crate::action::{ActionExecutor, ActionOutcome, ActionRegistry};
use crate::config::ManagementConfig;
use crate::consensus::{ConsensusEngine, ConsensusId, ConsensusRecord, ConsensusStage, ConsensusStatus, Request};
use crate::core::{Clock, Error, Identity, Result, SystemClock};
use crate::events::{EventSink, NullSink};
use crate::roles::{AccessControl, ExecutiveRole, Role, RoleRegistry};
use std::sync::Arc;
use tracing::info;

/// Weighted executive quorum guarding privileged operations.
pub struct Management {
    engine: ConsensusEngine,
    executor: ActionExecutor,
}

impl Management {
    /// Start building an instance with the three executive holders.
    pub fn builder(cto: impl Into<Identity>, ceo: impl Into<Identity>, coo: impl Into<Identity>) -> ManagementBuilder {
        ManagementBuilder::new(cto.into(), ceo.into(), coo.into())
    }

    /// Open a request. The caller becomes its applicant.
    pub fn start_consensus(&mut self, caller: &Identity, request: Request) -> Result<ConsensusId> {
        self.engine.start_consensus(caller, request)
    }

    /// Vote on the current record.
    pub fn vote_consensus(&mut self, caller: &Identity, id: &ConsensusId, approve: bool) -> Result<()> {
        self.engine.vote_consensus(caller, id, approve)
    }

    /// Withdraw the current record while voting.
    pub fn cancel_consensus(&mut self, caller: &Identity, id: &ConsensusId) -> Result<()> {
        self.engine.cancel_consensus(caller, id)
    }

    /// Resolve an expired record without a further vote.
    pub fn expire_consensus(&mut self, caller: &Identity, id: &ConsensusId) -> Result<ConsensusStatus> {
        self.engine.expire_consensus(caller, id)
    }

    /// Execute an accepted record's action.
    pub fn run_action(
        &mut self,
        caller: &Identity,
        id: &ConsensusId,
        param1: &[u8],
        param2: &[u8],
    ) -> Result<ActionOutcome> {
        self.executor.run_action(&mut self.engine, caller, id, param1, param2)
    }

    /// Drop an accepted record's action.
    pub fn cancel_action(&mut self, caller: &Identity, id: &ConsensusId) -> Result<()> {
        self.executor.cancel_action(&mut self.engine, caller, id)
    }

    /// Latest record id; zero if none was ever opened.
    pub fn current_consensus(&self) -> ConsensusId {
        self.engine.current_consensus()
    }

    pub fn consensus_data(&self, id: &ConsensusId) -> Option<ConsensusRecord> {
        self.engine.consensus_data(id)
    }

    pub fn consensus_status(&self, id: &ConsensusId) -> Option<ConsensusStatus> {
        self.engine.consensus_status(id)
    }

    pub fn consensus_stage(&self) -> ConsensusStage {
        self.engine.stage()
    }

    /// Whether `identity` holds `role` in the local registry.
    pub fn has_role(&self, identity: &Identity, role: &Role) -> bool {
        self.engine.roles().has_role(identity, role)
    }

    pub fn config(&self) -> &ManagementConfig {
        self.engine.config()
    }
}

/// Builder for [`Management`].
pub struct ManagementBuilder {
    executives: (Identity, Identity, Identity),
    config: ManagementConfig,
    handlers: ActionRegistry,
    roles: Option<Box<dyn RoleRegistry>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl ManagementBuilder {
    fn new(cto: Identity, ceo: Identity, coo: Identity) -> Self {
        Self {
            executives: (cto, ceo, coo),
            config: ManagementConfig::default(),
            handlers: ActionRegistry::new(),
            roles: None,
            clock: Arc::new(SystemClock),
            events: Arc::new(NullSink),
        }
    }

    pub fn config(mut self, config: ManagementConfig) -> Self {
        self.config = config;
        self
    }

    /// Handlers for target-dispatched kinds.
    pub fn handlers(mut self, handlers: ActionRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Use an existing registry; the executive seats are granted into it.
    /// Any executive seat it already holds must belong to the named holder.
    pub fn roles(mut self, roles: Box<dyn RoleRegistry>) -> Self {
        self.roles = Some(roles);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Validate and assemble.
    ///
    /// Fails if the config is invalid, a target-dispatched action kind has no
    /// handler, the three holders are not distinct, or a supplied registry
    /// already seats someone else in an executive role.
    pub fn build(self) -> Result<Management> {
        self.config.validate()?;
        self.handlers.ensure_complete()?;

        let (cto, ceo, coo) = self.executives;
        if cto == ceo || cto == coo || ceo == coo {
            return Err(Error::InvalidConfig(
                "executive holders must be distinct".to_string(),
            ));
        }

        let seats = [
            (ExecutiveRole::Cto, &cto),
            (ExecutiveRole::Ceo, &ceo),
            (ExecutiveRole::Coo, &coo),
        ];
        let mut roles = self.roles.unwrap_or_else(|| Box::new(AccessControl::new()));
        for (exec, holder) in seats {
            if let Some(other) = roles.holders(&exec.role()).into_iter().find(|h| h != holder) {
                return Err(Error::InvalidConfig(format!(
                    "{} is already held by {}",
                    exec.name(),
                    other
                )));
            }
        }
        for (exec, holder) in seats {
            roles.grant_role(exec.role(), holder.clone());
        }

        info!(
            cto = %cto,
            ceo = %ceo,
            coo = %coo,
            vote_duration_secs = self.config.vote_duration_secs,
            "Management initialized"
        );

        Ok(Management {
            engine: ConsensusEngine::new(self.config, roles, self.clock, self.events),
            executor: ActionExecutor::new(self.handlers),
        })
    }
}
