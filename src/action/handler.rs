//! Action handler interface.
//!
//! A handler is the only place the gate reaches into the target system.

use crate::consensus::{ConsensusId, Request};
use crate::core::Identity;
use serde::{Deserialize, Serialize};

/// Everything a handler gets to see.
#[derive(Clone, Copy, Debug)]
pub struct ActionContext<'a> {
    /// Record being executed
    pub id: &'a ConsensusId,
    /// The accepted request
    pub request: &'a Request,
    /// Applicant running the action
    pub applicant: &'a Identity,
    /// Caller-supplied opaque arguments from `run_action`. Only custom
    /// handlers read these; the token target adapter takes its operands
    /// from the request.
    pub param1: &'a [u8],
    pub param2: &'a [u8],
}

impl<'a> ActionContext<'a> {
    /// First target account, if the request named one.
    pub fn target1(&self) -> Option<&'a Identity> {
        self.request.target1.as_ref()
    }

    /// Second target account, if the request named one.
    pub fn target2(&self) -> Option<&'a Identity> {
        self.request.target2.as_ref()
    }
}

/// Result reported by the target system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the target call succeeded
    pub succeeded: bool,
    /// Opaque return data, echoed in the executed notification
    pub payload: Vec<u8>,
}

impl ActionOutcome {
    /// Successful call with return data.
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            succeeded: true,
            payload: payload.into(),
        }
    }

    /// Successful call without return data.
    pub fn empty() -> Self {
        Self::ok(Vec::new())
    }

    /// Failed call; the reason becomes the payload.
    pub fn failed(reason: &str) -> Self {
        Self {
            succeeded: false,
            payload: reason.as_bytes().to_vec(),
        }
    }
}

/// Performs the real-world effect of one action kind.
pub trait ActionHandler: Send + Sync {
    fn execute(&self, ctx: &ActionContext<'_>) -> ActionOutcome;
}

impl<F> ActionHandler for F
where
    F: Fn(&ActionContext<'_>) -> ActionOutcome + Send + Sync,
{
    fn execute(&self, ctx: &ActionContext<'_>) -> ActionOutcome {
        self(ctx)
    }
}
