//! Request ledger.
//!
//! Remembers every request id ever opened. Ids are never reclaimed, so the
//! set only grows.

use crate::consensus::Request;
use crate::core::{Error, Result};
use crate::roles::ExecutiveRole;
use std::collections::HashSet;
use tracing::warn;

/// Permanent record of used request ids.
#[derive(Clone, Debug, Default)]
pub struct RequestLedger {
    used: HashSet<u32>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `request` without reserving its id.
    pub fn check(&self, request: &Request) -> Result<()> {
        if request.id == 0 {
            return Err(Error::IllegalRequest);
        }
        if self.used.contains(&request.id) {
            return Err(Error::DuplicateRequestId(request.id));
        }
        if request.kind.is_role_change() && ExecutiveRole::from_role(&request.role).is_none() {
            return Err(Error::IllegalRole);
        }
        Ok(())
    }

    /// Validate `request` and mark its id used for good.
    pub fn reserve(&mut self, request: Request) -> Result<Request> {
        if let Err(e) = self.check(&request) {
            warn!(request_id = request.id, kind = ?request.kind, error = %e, "Request refused");
            return Err(e);
        }
        self.used.insert(request.id);
        Ok(request)
    }

    /// Whether `id` has been used.
    pub fn is_used(&self, id: u32) -> bool {
        self.used.contains(&id)
    }

    /// Number of ids used so far.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
