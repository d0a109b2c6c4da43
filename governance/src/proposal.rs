//! Proposal records and derived lifecycle state.

use agora_types::{Action, Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// The lifecycle state of a proposal.
///
/// Except for `Executed`, state is never stored - it is recomputed from the
/// proposal's timestamps and the external clock on every query, so a
/// transition can never be "missed" by a forgotten trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created, voting has not started yet.
    Pending,
    /// Voting window is open.
    Active,
    /// Deadline passed, quorum and majority met. Executable.
    Succeeded,
    /// Deadline passed, quorum or majority not met. Terminal.
    Defeated,
    /// Successfully executed. Terminal.
    Executed,
}

/// How a voter votes on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    For,
    Against,
    Abstain,
}

/// A governance proposal.
///
/// Created on `propose`, never deleted (superseded records move to the audit
/// archive), mutated only by the `executed` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Content-derived identifier.
    pub id: ProposalId,
    /// Who proposed it.
    pub proposer: Address,
    /// The external calls to perform on success, in execution order.
    pub actions: Vec<Action>,
    /// Free-form description text.
    pub description: String,
    /// When the proposal was created.
    pub created_at: Timestamp,
    /// Voting start - also the snapshot reference point at which voting
    /// power is measured.
    pub vote_start: Timestamp,
    /// Voting deadline. At this instant voting is closed and the outcome is
    /// defined.
    pub deadline: Timestamp,
    /// Whether the proposal's actions have been executed.
    pub executed: bool,
}

impl Proposal {
    /// Derive the lifecycle state at `now`.
    ///
    /// `passed` is whether the vote tally satisfies the quorum and majority
    /// rules; it is only consulted once the deadline has been reached.
    /// Voting is open from `vote_start` inclusive to `deadline` exclusive.
    pub fn state_at(&self, now: Timestamp, passed: bool) -> ProposalState {
        if self.executed {
            ProposalState::Executed
        } else if now < self.vote_start {
            ProposalState::Pending
        } else if now < self.deadline {
            ProposalState::Active
        } else if passed {
            ProposalState::Succeeded
        } else {
            ProposalState::Defeated
        }
    }

    /// Whether the proposal is resolved at `now`: Defeated or Executed.
    ///
    /// A resolved proposal no longer blocks re-submission of identical
    /// content. Succeeded-but-unexecuted proposals are *not* resolved - they
    /// still own their id until executed.
    pub fn is_resolved(&self, now: Timestamp, passed: bool) -> bool {
        matches!(
            self.state_at(now, passed),
            ProposalState::Defeated | ProposalState::Executed
        )
    }
}
