//! Quorum decision tiers.
//!
//! Pure functions over the running tally. The engine feeds in the tally after
//! a vote has been applied and acts on the returned decision.

use crate::roles::TOTAL_WEIGHT;
use serde::{Deserialize, Serialize};

/// Tally a super-majority request must strictly exceed.
pub const SUPER_MAJORITY: i32 = 60;

/// Decision policy bound to an action kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuorumTier {
    /// Every executive must approve.
    Full,
    /// Net tally must exceed 60.
    GreaterThan60,
    /// Sign of the net tally wins as soon as it cannot change.
    Max,
}

/// Outcome of evaluating a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuorumDecision {
    Accept,
    Reject,
    Undecided,
}

impl QuorumDecision {
    fn by_sign(net_tally: i32) -> Self {
        // A tie resolves to acceptance.
        if net_tally >= 0 {
            QuorumDecision::Accept
        } else {
            QuorumDecision::Reject
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, QuorumDecision::Undecided)
    }
}

/// Snapshot of the tally handed to [`QuorumTier::decide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TallySnapshot {
    /// Yes-weight minus no-weight, after the latest vote
    pub net_tally: i32,
    /// Weight of executives that have not voted yet
    pub remaining_weight: i32,
    /// Whether the latest vote approved; `None` when resolving without a vote
    pub last_vote: Option<bool>,
    /// Whether the record's deadline has passed
    pub timed_out: bool,
}

impl TallySnapshot {
    /// Whether every executive has voted.
    pub fn all_voted(&self) -> bool {
        self.remaining_weight <= 0
    }
}

impl QuorumTier {
    /// Decide the record given the current tally.
    pub fn decide(&self, tally: &TallySnapshot) -> QuorumDecision {
        match self {
            QuorumTier::Full => {
                if tally.last_vote == Some(false) {
                    // Unanimity is out of reach.
                    QuorumDecision::Reject
                } else if tally.net_tally == TOTAL_WEIGHT {
                    QuorumDecision::Accept
                } else if tally.timed_out {
                    QuorumDecision::Reject
                } else {
                    QuorumDecision::Undecided
                }
            }
            QuorumTier::GreaterThan60 => {
                if tally.net_tally > SUPER_MAJORITY {
                    QuorumDecision::Accept
                } else if tally.all_voted() || tally.timed_out {
                    QuorumDecision::Reject
                } else {
                    QuorumDecision::Undecided
                }
            }
            QuorumTier::Max => {
                if tally.net_tally.abs() > tally.remaining_weight
                    || tally.all_voted()
                    || tally.timed_out
                {
                    QuorumDecision::by_sign(tally.net_tally)
                } else {
                    QuorumDecision::Undecided
                }
            }
        }
    }
}
