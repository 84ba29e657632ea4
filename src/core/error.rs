//! Error types for the quorum gate.

use crate::consensus::ActionKind;
use crate::core::Identity;
use thiserror::Error;

/// Result type alias for quorum gate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quorum gate operations.
///
/// Every runtime failure is a local validation failure: the ledger and the
/// current record are left exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Authorization errors
    #[error("UnauthorizedError({0})")]
    Unauthorized(Identity),

    #[error("ForbiddenError({0})")]
    Forbidden(Identity),

    // Request errors
    #[error("IllegalRequestError(): request id must be non-zero")]
    IllegalRequest,

    #[error("DuplicateRequestIdError(): request id {0} was already used")]
    DuplicateRequestId(u32),

    #[error("IllegalRoleError(): role is not an executive role")]
    IllegalRole,

    // Lifecycle errors
    #[error("InvalidStageError()")]
    InvalidStage,

    #[error("IllegalVoteError(): principal already voted")]
    IllegalVote,

    // Construction errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No handler registered for action {0:?}")]
    UnsupportedAction(ActionKind),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
