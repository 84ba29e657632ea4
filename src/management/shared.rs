//! Shared handle for concurrent callers.
//!
//! Every operation takes the lock for its whole duration, so calls from
//! different tasks are applied one at a time in lock order.

use crate::action::ActionOutcome;
use crate::consensus::{ConsensusId, ConsensusRecord, ConsensusStage, ConsensusStatus, Request};
use crate::core::{Identity, Result};
use crate::management::Management;
use crate::roles::Role;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Cloneable async handle over one [`Management`].
#[derive(Clone)]
pub struct SharedManagement {
    inner: Arc<Mutex<Management>>,
}

impl SharedManagement {
    pub fn new(management: Management) -> Self {
        Self {
            inner: Arc::new(Mutex::new(management)),
        }
    }

    /// Hold the lock across several calls.
    pub async fn lock(&self) -> MutexGuard<'_, Management> {
        self.inner.lock().await
    }

    pub async fn start_consensus(&self, caller: &Identity, request: Request) -> Result<ConsensusId> {
        self.inner.lock().await.start_consensus(caller, request)
    }

    pub async fn vote_consensus(&self, caller: &Identity, id: &ConsensusId, approve: bool) -> Result<()> {
        self.inner.lock().await.vote_consensus(caller, id, approve)
    }

    pub async fn cancel_consensus(&self, caller: &Identity, id: &ConsensusId) -> Result<()> {
        self.inner.lock().await.cancel_consensus(caller, id)
    }

    pub async fn expire_consensus(&self, caller: &Identity, id: &ConsensusId) -> Result<ConsensusStatus> {
        self.inner.lock().await.expire_consensus(caller, id)
    }

    pub async fn run_action(
        &self,
        caller: &Identity,
        id: &ConsensusId,
        param1: &[u8],
        param2: &[u8],
    ) -> Result<ActionOutcome> {
        self.inner.lock().await.run_action(caller, id, param1, param2)
    }

    pub async fn cancel_action(&self, caller: &Identity, id: &ConsensusId) -> Result<()> {
        self.inner.lock().await.cancel_action(caller, id)
    }

    pub async fn current_consensus(&self) -> ConsensusId {
        self.inner.lock().await.current_consensus()
    }

    pub async fn consensus_data(&self, id: &ConsensusId) -> Option<ConsensusRecord> {
        self.inner.lock().await.consensus_data(id)
    }

    pub async fn consensus_status(&self, id: &ConsensusId) -> Option<ConsensusStatus> {
        self.inner.lock().await.consensus_status(id)
    }

    pub async fn consensus_stage(&self) -> ConsensusStage {
        self.inner.lock().await.consensus_stage()
    }

    pub async fn has_role(&self, identity: &Identity, role: &Role) -> bool {
        self.inner.lock().await.has_role(identity, role)
    }
}

impl From<Management> for SharedManagement {
    fn from(management: Management) -> Self {
        Self::new(management)
    }
}
