//! Consensus engine.
//!
//! Owns the single in-flight record and drives it through voting. Every
//! mutating call validates fully before touching state, so a failed call
//! leaves the ledger and the record exactly as they were.

use crate::config::ManagementConfig;
use crate::consensus::{
    ActionStatus, ConsensusId, ConsensusRecord, ConsensusStage, ConsensusStatus, QuorumDecision,
    Request, RequestLedger,
};
use crate::core::{Clock, Error, Identity, Result, Timestamp};
use crate::events::{ConsensusEvent, ConsensusEventKind, EventSink};
use crate::roles::RoleRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single-record consensus state machine.
pub struct ConsensusEngine {
    config: ManagementConfig,
    ledger: RequestLedger,
    current: Option<ConsensusRecord>,
    roles: Box<dyn RoleRegistry>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl ConsensusEngine {
    /// Create an engine. The config is assumed validated.
    pub fn new(
        config: ManagementConfig,
        roles: Box<dyn RoleRegistry>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            ledger: RequestLedger::new(),
            current: None,
            roles,
            clock,
            events,
        }
    }

    /// Open a new record for `request` with the caller's implicit yes.
    pub fn start_consensus(&mut self, caller: &Identity, request: Request) -> Result<ConsensusId> {
        let weight = self.voter_weight(caller)?;
        if self.stage() != ConsensusStage::NoneStage {
            warn!(caller = %caller, "Consensus start refused, another request is in flight");
            return Err(Error::InvalidStage);
        }
        let request = self.ledger.reserve(request)?;

        let now = self.clock.now();
        let expires_at = self.config.vote_duration().map(|d| now + d);
        let record = ConsensusRecord::open(request, caller.clone(), weight, now, expires_at);
        let id = record.id;
        let kind = record.request.kind;

        info!(
            record_id = %id,
            request_id = record.request.id,
            kind = ?kind,
            caller = %caller,
            tally = weight,
            "Consensus started"
        );
        self.current = Some(record);
        self.emit(
            now,
            ConsensusEventKind::ConsensusStarted {
                applicant: caller.clone(),
                id,
                kind,
            },
        );
        Ok(id)
    }

    /// Cast the caller's vote on the current record.
    ///
    /// Expiry is read before the vote is applied, but the vote's weight still
    /// counts: a late vote is tallied and then resolved through the tier's
    /// timeout branch.
    pub fn vote_consensus(&mut self, caller: &Identity, id: &ConsensusId, approve: bool) -> Result<()> {
        let weight = self.voter_weight(caller)?;
        let total = self.config.weights.total();
        let now = self.clock.now();

        let record = Self::voting_record(&mut self.current, id)?;
        if record.has_voted(caller) {
            warn!(record_id = %id, caller = %caller, "Duplicate vote refused");
            return Err(Error::IllegalVote);
        }

        let timed_out = record.is_expired(now);
        record.apply_vote(caller.clone(), weight, approve);
        let snapshot = record.snapshot(total, Some(approve), timed_out);
        let decision = record.request.kind.tier().decide(&snapshot);

        debug!(
            record_id = %id,
            caller = %caller,
            approve,
            tally = record.net_tally,
            remaining = snapshot.remaining_weight,
            timed_out,
            "Vote applied"
        );

        if let Some(event) = Self::finalize(record, decision) {
            self.emit(now, event);
        }
        Ok(())
    }

    /// Resolve an expired record through its tier's timeout branch without a
    /// new vote. Any executive may call this once the deadline has passed.
    pub fn expire_consensus(&mut self, caller: &Identity, id: &ConsensusId) -> Result<ConsensusStatus> {
        self.voter_weight(caller)?;
        let total = self.config.weights.total();
        let now = self.clock.now();

        let record = Self::voting_record(&mut self.current, id)?;
        if !record.is_expired(now) {
            return Err(Error::InvalidStage);
        }

        let decision = record
            .request
            .kind
            .tier()
            .decide(&record.snapshot(total, None, true));
        let event = Self::finalize(record, decision);
        let status = record.status;

        if let Some(event) = event {
            self.emit(now, event);
        }
        Ok(status)
    }

    /// Withdraw the current record while it is still voting. Applicant only.
    pub fn cancel_consensus(&mut self, caller: &Identity, id: &ConsensusId) -> Result<()> {
        let now = self.clock.now();
        let record = Self::matching_record(&mut self.current, id)?;
        if record.applicant != *caller {
            warn!(record_id = %id, caller = %caller, "Consensus cancel forbidden");
            return Err(Error::Forbidden(caller.clone()));
        }
        if record.status != ConsensusStatus::Voting {
            return Err(Error::InvalidStage);
        }

        record.status = ConsensusStatus::Canceled;
        info!(record_id = %id, kind = ?record.request.kind, "Consensus canceled");
        let event = ConsensusEventKind::ConsensusCanceled {
            applicant: record.applicant.clone(),
            id: *id,
            kind: record.request.kind,
        };
        self.emit(now, event);
        Ok(())
    }

    /// Id of the latest record, or the zero sentinel if none was ever opened.
    pub fn current_consensus(&self) -> ConsensusId {
        self.current.as_ref().map(|r| r.id).unwrap_or_else(ConsensusId::zero)
    }

    /// Snapshot of the record with `id`, if it is the latest one.
    pub fn consensus_data(&self, id: &ConsensusId) -> Option<ConsensusRecord> {
        self.current.as_ref().filter(|r| r.id == *id).cloned()
    }

    /// Voting status of the record with `id`, if it is the latest one.
    pub fn consensus_status(&self, id: &ConsensusId) -> Option<ConsensusStatus> {
        self.current.as_ref().filter(|r| r.id == *id).map(|r| r.status)
    }

    /// Derived stage of the latest record.
    pub fn stage(&self) -> ConsensusStage {
        self.current
            .as_ref()
            .map(ConsensusRecord::stage)
            .unwrap_or(ConsensusStage::NoneStage)
    }

    /// Role membership the engine authorizes against.
    pub fn roles(&self) -> &dyn RoleRegistry {
        self.roles.as_ref()
    }

    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    pub(crate) fn roles_mut(&mut self) -> &mut dyn RoleRegistry {
        self.roles.as_mut()
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// The latest record, if its id is `id`.
    pub(crate) fn record_mut(&mut self, id: &ConsensusId) -> Result<&mut ConsensusRecord> {
        Self::matching_record(&mut self.current, id)
    }

    pub(crate) fn emit(&self, at: Timestamp, kind: ConsensusEventKind) {
        self.events.emit(ConsensusEvent::at(at, kind));
    }

    /// Weight of the caller's executive role.
    fn voter_weight(&self, caller: &Identity) -> Result<i32> {
        match self.roles.executive_role_of(caller) {
            Some(role) => Ok(self.config.weights.weight_of(role)),
            None => {
                warn!(caller = %caller, "Caller holds no executive role");
                Err(Error::Unauthorized(caller.clone()))
            }
        }
    }

    fn matching_record<'a>(
        current: &'a mut Option<ConsensusRecord>,
        id: &ConsensusId,
    ) -> Result<&'a mut ConsensusRecord> {
        current
            .as_mut()
            .filter(|r| r.id == *id)
            .ok_or(Error::InvalidStage)
    }

    fn voting_record<'a>(
        current: &'a mut Option<ConsensusRecord>,
        id: &ConsensusId,
    ) -> Result<&'a mut ConsensusRecord> {
        let record = Self::matching_record(current, id)?;
        if record.stage() != ConsensusStage::VoteStage {
            return Err(Error::InvalidStage);
        }
        Ok(record)
    }

    /// Apply a final decision to the record and describe it.
    fn finalize(record: &mut ConsensusRecord, decision: QuorumDecision) -> Option<ConsensusEventKind> {
        let status = match decision {
            QuorumDecision::Accept => {
                record.action_status = ActionStatus::Pending;
                ConsensusStatus::Accepted
            }
            QuorumDecision::Reject => ConsensusStatus::Rejected,
            QuorumDecision::Undecided => return None,
        };
        record.status = status;

        info!(
            record_id = %record.id,
            kind = ?record.request.kind,
            status = ?status,
            tally = record.net_tally,
            "Consensus finished"
        );
        Some(ConsensusEventKind::ConsensusFinished {
            applicant: record.applicant.clone(),
            id: record.id,
            status,
            kind: record.request.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::ActionKind;
    use crate::core::{now, ManualClock};
    use crate::events::EventLog;
    use crate::roles::{AccessControl, ExecutiveRole, Role};

    struct Harness {
        engine: ConsensusEngine,
        clock: Arc<ManualClock>,
        events: Arc<EventLog>,
    }

    fn harness(vote_duration_secs: u32) -> Harness {
        let clock = Arc::new(ManualClock::new(now()));
        let events = Arc::new(EventLog::default());
        let roles = AccessControl::with_executives("cto".into(), "ceo".into(), "coo".into());
        let engine = ConsensusEngine::new(
            ManagementConfig::default().with_vote_duration(vote_duration_secs),
            Box::new(roles),
            clock.clone(),
            events.clone(),
        );
        Harness { engine, clock, events }
    }

    fn who(name: &str) -> Identity {
        Identity::new(name)
    }

    #[test]
    fn test_fresh_engine_is_idle() {
        let h = harness(0);
        assert_eq!(h.engine.stage(), ConsensusStage::NoneStage);
        assert!(h.engine.current_consensus().is_zero());
        assert_eq!(h.engine.consensus_data(&ConsensusId::for_request(1)), None);
    }

    #[test]
    fn test_outsider_cannot_start() {
        let mut h = harness(0);
        let err = h
            .engine
            .start_consensus(&who("mallory"), Request::new(1, ActionKind::GrantRole))
            .unwrap_err();
        assert_eq!(err, Error::Unauthorized(who("mallory")));
        assert!(h.engine.current_consensus().is_zero());
        assert!(!h.engine.ledger().is_used(1));
    }

    #[test]
    fn test_start_opens_voting_record() {
        let mut h = harness(0);
        let request = Request::new(1, ActionKind::GrantRole)
            .with_targets("acc1", "acc2")
            .with_role(Role::from_name("ADMIN_ROLE"));
        let id = h.engine.start_consensus(&who("cto"), request.clone()).unwrap();

        assert_eq!(id, ConsensusId::for_request(1));
        assert_eq!(h.engine.current_consensus(), id);
        assert_eq!(h.engine.stage(), ConsensusStage::VoteStage);
        assert_eq!(h.engine.consensus_status(&id), Some(ConsensusStatus::Voting));

        let data = h.engine.consensus_data(&id).unwrap();
        assert_eq!(data.request, request);
        assert_eq!(data.net_tally, 32);
        assert_eq!(data.action_status, ActionStatus::None);
        assert_eq!(data.expires_at, None);

        assert_eq!(
            h.events.last().unwrap().kind,
            ConsensusEventKind::ConsensusStarted {
                applicant: who("cto"),
                id,
                kind: ActionKind::GrantRole,
            }
        );
    }

    #[test]
    fn test_second_start_while_voting_fails() {
        let mut h = harness(0);
        h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Mint)).unwrap();
        let err = h
            .engine
            .start_consensus(&who("ceo"), Request::new(2, ActionKind::Burn))
            .unwrap_err();
        assert_eq!(err, Error::InvalidStage);
        // The refused request did not burn its id.
        assert!(!h.engine.ledger().is_used(2));
    }

    #[test]
    fn test_zero_id_rejected_before_open() {
        let mut h = harness(0);
        assert_eq!(
            h.engine.start_consensus(&who("cto"), Request::new(0, ActionKind::Mint)),
            Err(Error::IllegalRequest)
        );
        assert_eq!(h.engine.stage(), ConsensusStage::NoneStage);
    }

    #[test]
    fn test_full_tier_unanimous_accept() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Mint)).unwrap();

        h.engine.vote_consensus(&who("ceo"), &id, true).unwrap();
        assert_eq!(h.engine.consensus_data(&id).unwrap().net_tally, 68);
        assert_eq!(h.engine.stage(), ConsensusStage::VoteStage);

        h.engine.vote_consensus(&who("coo"), &id, true).unwrap();
        let data = h.engine.consensus_data(&id).unwrap();
        assert_eq!(data.net_tally, 100);
        assert_eq!(data.status, ConsensusStatus::Accepted);
        assert_eq!(data.action_status, ActionStatus::Pending);
        assert_eq!(h.engine.stage(), ConsensusStage::ActionStage);
    }

    #[test]
    fn test_full_tier_single_no_rejects() {
        let mut h = harness(0);
        let id = h
            .engine
            .start_consensus(&who("ceo"), Request::new(1, ActionKind::RevokeRole))
            .unwrap();
        h.engine.vote_consensus(&who("cto"), &id, false).unwrap();

        let data = h.engine.consensus_data(&id).unwrap();
        assert_eq!(data.status, ConsensusStatus::Rejected);
        assert_eq!(data.action_status, ActionStatus::None);
        assert_eq!(data.net_tally, 4);
        assert_eq!(h.engine.stage(), ConsensusStage::NoneStage);

        // Voting on a finished record is out of stage.
        assert_eq!(
            h.engine.vote_consensus(&who("coo"), &id, true),
            Err(Error::InvalidStage)
        );
    }

    #[test]
    fn test_finished_event_names_applicant() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Approve)).unwrap();
        h.engine.vote_consensus(&who("coo"), &id, true).unwrap();

        assert_eq!(
            h.events.last().unwrap().kind,
            ConsensusEventKind::ConsensusFinished {
                applicant: who("cto"),
                id,
                status: ConsensusStatus::Accepted,
                kind: ActionKind::Approve,
            }
        );
    }

    #[test]
    fn test_double_vote_is_illegal_and_changes_nothing() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Mint)).unwrap();
        h.engine.vote_consensus(&who("ceo"), &id, true).unwrap();

        assert_eq!(h.engine.vote_consensus(&who("cto"), &id, true), Err(Error::IllegalVote));
        assert_eq!(h.engine.vote_consensus(&who("ceo"), &id, false), Err(Error::IllegalVote));
        assert_eq!(h.engine.consensus_data(&id).unwrap().net_tally, 68);
    }

    #[test]
    fn test_outsider_vote_unauthorized() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Mint)).unwrap();
        assert_eq!(
            h.engine.vote_consensus(&who("mallory"), &id, true),
            Err(Error::Unauthorized(who("mallory")))
        );
    }

    #[test]
    fn test_vote_on_unknown_record_is_invalid_stage() {
        let mut h = harness(0);
        h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Mint)).unwrap();
        assert_eq!(
            h.engine.vote_consensus(&who("ceo"), &ConsensusId::for_request(2), true),
            Err(Error::InvalidStage)
        );
    }

    #[test]
    fn test_cancel_by_applicant_frees_slot() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(3, ActionKind::Burn)).unwrap();

        assert_eq!(
            h.engine.cancel_consensus(&who("coo"), &id),
            Err(Error::Forbidden(who("coo")))
        );
        assert_eq!(h.engine.consensus_data(&id).unwrap().net_tally, 32);

        assert_eq!(h.events.len(), 1);

        h.engine.cancel_consensus(&who("cto"), &id).unwrap();
        assert_eq!(h.engine.consensus_status(&id), Some(ConsensusStatus::Canceled));
        assert_eq!(h.engine.stage(), ConsensusStage::NoneStage);
        assert_eq!(
            h.events.last().unwrap().kind,
            ConsensusEventKind::ConsensusCanceled {
                applicant: who("cto"),
                id,
                kind: ActionKind::Burn,
            }
        );
        assert_eq!(h.engine.cancel_consensus(&who("cto"), &id), Err(Error::InvalidStage));

        // The id stays burned, a fresh one opens fine.
        assert_eq!(
            h.engine.start_consensus(&who("ceo"), Request::new(3, ActionKind::Burn)),
            Err(Error::DuplicateRequestId(3))
        );
        assert!(h.engine.start_consensus(&who("ceo"), Request::new(4, ActionKind::Burn)).is_ok());
    }

    #[test]
    fn test_late_vote_applies_then_times_out() {
        let mut h = harness(1);
        let id = h
            .engine
            .start_consensus(&who("cto"), Request::new(1, ActionKind::Unfreeze))
            .unwrap();
        h.clock.advance(chrono::Duration::seconds(1));

        h.engine.vote_consensus(&who("coo"), &id, false).unwrap();
        let data = h.engine.consensus_data(&id).unwrap();
        assert_eq!(data.net_tally, 0);
        assert_eq!(data.status, ConsensusStatus::Accepted);
        assert_eq!(data.action_status, ActionStatus::Pending);
    }

    #[test]
    fn test_expire_consensus_requires_elapsed_deadline() {
        let mut h = harness(10);
        let id = h.engine.start_consensus(&who("coo"), Request::new(1, ActionKind::ChangeRole).with_role(ExecutiveRole::Coo)).unwrap();

        assert_eq!(h.engine.expire_consensus(&who("cto"), &id), Err(Error::InvalidStage));
        h.clock.advance(chrono::Duration::seconds(10));
        assert_eq!(
            h.engine.expire_consensus(&who("mallory"), &id),
            Err(Error::Unauthorized(who("mallory")))
        );
        assert_eq!(h.engine.expire_consensus(&who("cto"), &id), Ok(ConsensusStatus::Rejected));
        assert_eq!(h.engine.stage(), ConsensusStage::NoneStage);
        assert_eq!(h.engine.consensus_data(&id).unwrap().net_tally, 32);
    }

    #[test]
    fn test_expire_without_deadline_is_invalid() {
        let mut h = harness(0);
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Pause)).unwrap();
        h.clock.advance(chrono::Duration::days(3650));
        assert_eq!(h.engine.expire_consensus(&who("ceo"), &id), Err(Error::InvalidStage));
    }

    #[test]
    fn test_start_sets_deadline() {
        let mut h = harness(60);
        let opened = h.clock.now();
        let id = h.engine.start_consensus(&who("cto"), Request::new(1, ActionKind::Pause)).unwrap();
        let data = h.engine.consensus_data(&id).unwrap();
        assert_eq!(data.opened_at, opened);
        assert_eq!(data.expires_at, Some(opened + chrono::Duration::seconds(60)));
    }
}
