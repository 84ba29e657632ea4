//! The consensus record and its derived stage.

use crate::consensus::{ConsensusId, Request, TallySnapshot};
use crate::core::{Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Voting outcome of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsensusStatus {
    Accepted,
    Rejected,
    Canceled,
    Voting,
}

/// Execution state of an accepted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionStatus {
    Success,
    Pending,
    Canceled,
    None,
}

/// Lifecycle phase, computed from the two statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsensusStage {
    NoneStage,
    VoteStage,
    ActionStage,
}

/// The single record for the request currently in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    /// Public id derived from the request id
    pub id: ConsensusId,
    /// The wrapped request
    pub request: Request,
    /// Identity that opened the record
    pub applicant: Identity,
    /// Yes-weight minus no-weight, seeded with the applicant's weight
    pub net_tally: i32,
    /// Principals that already voted, applicant included
    pub voted: BTreeSet<Identity>,
    /// Absolute weight of every vote cast so far
    pub cast_weight: i32,
    pub status: ConsensusStatus,
    pub action_status: ActionStatus,
    pub opened_at: Timestamp,
    /// `None` means the record never times out
    pub expires_at: Option<Timestamp>,
}

impl ConsensusRecord {
    /// Open a record with the applicant's implicit yes.
    pub fn open(
        request: Request,
        applicant: Identity,
        applicant_weight: i32,
        opened_at: Timestamp,
        expires_at: Option<Timestamp>,
    ) -> Self {
        let mut voted = BTreeSet::new();
        voted.insert(applicant.clone());

        Self {
            id: ConsensusId::for_request(request.id),
            request,
            applicant,
            net_tally: applicant_weight,
            voted,
            cast_weight: applicant_weight,
            status: ConsensusStatus::Voting,
            action_status: ActionStatus::None,
            opened_at,
            expires_at,
        }
    }

    /// Derived lifecycle stage.
    pub fn stage(&self) -> ConsensusStage {
        match (self.status, self.action_status) {
            (ConsensusStatus::Voting, _) => ConsensusStage::VoteStage,
            (ConsensusStatus::Accepted, ActionStatus::Pending) => ConsensusStage::ActionStage,
            _ => ConsensusStage::NoneStage,
        }
    }

    /// Whether `who` already voted on this record.
    pub fn has_voted(&self, who: &Identity) -> bool {
        self.voted.contains(who)
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.map(|deadline| now >= deadline).unwrap_or(false)
    }

    /// Apply one vote. Only valid while voting.
    pub(crate) fn apply_vote(&mut self, voter: Identity, weight: i32, approve: bool) {
        debug_assert_eq!(self.status, ConsensusStatus::Voting);
        if approve {
            self.net_tally += weight;
        } else {
            self.net_tally -= weight;
        }
        self.cast_weight += weight;
        self.voted.insert(voter);
    }

    /// Tally as seen by the quorum tiers.
    pub fn snapshot(&self, total_weight: i32, last_vote: Option<bool>, timed_out: bool) -> TallySnapshot {
        TallySnapshot {
            net_tally: self.net_tally,
            remaining_weight: total_weight - self.cast_weight,
            last_vote,
            timed_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::ActionKind;
    use crate::core::now;

    fn record() -> ConsensusRecord {
        ConsensusRecord::open(Request::new(1, ActionKind::Mint), "cto".into(), 32, now(), None)
    }

    #[test]
    fn test_open_seeds_applicant() {
        let record = record();
        assert_eq!(record.net_tally, 32);
        assert!(record.has_voted(&"cto".into()));
        assert_eq!(record.status, ConsensusStatus::Voting);
        assert_eq!(record.action_status, ActionStatus::None);
        assert_eq!(record.stage(), ConsensusStage::VoteStage);
        assert_eq!(record.id, ConsensusId::for_request(1));
    }

    #[test]
    fn test_stage_derivation() {
        let mut record = record();
        record.status = ConsensusStatus::Accepted;
        record.action_status = ActionStatus::Pending;
        assert_eq!(record.stage(), ConsensusStage::ActionStage);

        record.action_status = ActionStatus::Success;
        assert_eq!(record.stage(), ConsensusStage::NoneStage);

        record.action_status = ActionStatus::Canceled;
        assert_eq!(record.stage(), ConsensusStage::NoneStage);

        record.status = ConsensusStatus::Rejected;
        record.action_status = ActionStatus::None;
        assert_eq!(record.stage(), ConsensusStage::NoneStage);
    }

    #[test]
    fn test_apply_vote_and_snapshot() {
        let mut record = record();
        record.apply_vote("ceo".into(), 36, false);
        assert_eq!(record.net_tally, -4);

        let snap = record.snapshot(100, Some(false), false);
        assert_eq!(snap.remaining_weight, 32);
        assert!(!snap.all_voted());

        record.apply_vote("coo".into(), 32, false);
        let snap = record.snapshot(100, Some(false), false);
        assert_eq!(snap.net_tally, -36);
        assert!(snap.all_voted());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let opened = now();
        let deadline = opened + chrono::Duration::seconds(1);
        let timed = ConsensusRecord::open(
            Request::new(1, ActionKind::Pause),
            "cto".into(),
            32,
            opened,
            Some(deadline),
        );
        assert!(!timed.is_expired(opened));
        assert!(timed.is_expired(deadline));
        assert!(!record().is_expired(deadline + chrono::Duration::days(365)));
    }
}
