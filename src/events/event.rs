//! Notifications emitted on every lifecycle transition.

use crate::consensus::{ActionKind, ActionStatus, ConsensusId, ConsensusStatus};
use crate::core::{now, Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// What happened.
///
/// Every variant names the applicant, never the caller that triggered it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum ConsensusEventKind {
    ConsensusStarted {
        applicant: Identity,
        id: ConsensusId,
        kind: ActionKind,
    },
    ConsensusFinished {
        applicant: Identity,
        id: ConsensusId,
        status: ConsensusStatus,
        kind: ActionKind,
    },
    ConsensusCanceled {
        applicant: Identity,
        id: ConsensusId,
        kind: ActionKind,
    },
    ActionExecuted {
        applicant: Identity,
        id: ConsensusId,
        kind: ActionKind,
        status: ActionStatus,
        payload: Vec<u8>,
    },
    ActionCanceled {
        applicant: Identity,
        id: ConsensusId,
        kind: ActionKind,
    },
}

impl ConsensusEventKind {
    /// Record the event refers to.
    pub fn consensus_id(&self) -> &ConsensusId {
        match self {
            ConsensusEventKind::ConsensusStarted { id, .. }
            | ConsensusEventKind::ConsensusFinished { id, .. }
            | ConsensusEventKind::ConsensusCanceled { id, .. }
            | ConsensusEventKind::ActionExecuted { id, .. }
            | ConsensusEventKind::ActionCanceled { id, .. } => id,
        }
    }

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ConsensusEventKind::ConsensusStarted { .. } => "ConsensusStarted",
            ConsensusEventKind::ConsensusFinished { .. } => "ConsensusFinished",
            ConsensusEventKind::ConsensusCanceled { .. } => "ConsensusCanceled",
            ConsensusEventKind::ActionExecuted { .. } => "ActionExecuted",
            ConsensusEventKind::ActionCanceled { .. } => "ActionCanceled",
        }
    }
}

/// A timestamped notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusEvent {
    pub at: Timestamp,
    #[serde(flatten)]
    pub kind: ConsensusEventKind,
}

impl ConsensusEvent {
    /// Stamp an event with the given time.
    pub fn at(at: Timestamp, kind: ConsensusEventKind) -> Self {
        Self { at, kind }
    }

    /// Stamp an event with the wall clock.
    pub fn now(kind: ConsensusEventKind) -> Self {
        Self::at(now(), kind)
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
