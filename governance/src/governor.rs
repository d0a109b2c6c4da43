//! The public governance surface - composes the engine with its
//! collaborators.

use crate::engine::ProposalEngine;
use crate::error::GovernanceError;
use crate::params::GovernorParams;
use crate::proposal::{Proposal, ProposalState, VoteType};
use crate::snapshot::SnapshotResolver;
use crate::votes::{Tally, VoteLedger};
use agora_ledger::{ActionExecutor, Ledger};
use agora_types::{Action, Address, ProposalId, Timestamp, VoteWeight};
use serde::{Deserialize, Serialize};

/// A governance deployment: one engine, one vote ledger, one snapshot
/// resolver, wired to the host ledger.
///
/// The facade holds no state of its own - it validates inputs, reads the
/// current time from the ledger, and delegates.
pub struct Governor<L: Ledger> {
    ledger: L,
    engine: ProposalEngine,
    votes: VoteLedger,
    snapshots: SnapshotResolver,
}

impl<L: Ledger> Governor<L> {
    pub fn new(params: GovernorParams, ledger: L) -> Result<Self, GovernanceError> {
        Ok(Self {
            ledger,
            engine: ProposalEngine::new(params)?,
            votes: VoteLedger::new(),
            snapshots: SnapshotResolver::new(),
        })
    }

    /// Submit a proposal. Returns its content-derived id.
    pub fn propose(
        &mut self,
        actions: Vec<Action>,
        description: impl Into<String>,
        proposer: impl Into<Address>,
    ) -> Result<ProposalId, GovernanceError> {
        let description = description.into();
        if actions.is_empty() {
            return Err(GovernanceError::EmptyActionSet);
        }
        if description.trim().is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }

        let now = self.ledger.now();
        let id = self
            .engine
            .propose(actions, description, proposer.into(), now, &mut self.votes)?;
        let reference = self.engine.proposal_snapshot(&id)?;
        self.snapshots.bind(id, reference);
        Ok(id)
    }

    /// Cast a vote. Returns the snapshot weight the vote was recorded with.
    pub fn cast_vote(
        &mut self,
        id: &ProposalId,
        voter: impl Into<Address>,
        vote_type: VoteType,
    ) -> Result<VoteWeight, GovernanceError> {
        self.cast_vote_inner(id, voter.into(), vote_type, None)
    }

    /// Cast a vote with a free-form justification.
    pub fn cast_vote_with_reason(
        &mut self,
        id: &ProposalId,
        voter: impl Into<Address>,
        vote_type: VoteType,
        reason: impl Into<String>,
    ) -> Result<VoteWeight, GovernanceError> {
        self.cast_vote_inner(id, voter.into(), vote_type, Some(reason.into()))
    }

    fn cast_vote_inner(
        &mut self,
        id: &ProposalId,
        voter: Address,
        vote_type: VoteType,
        reason: Option<String>,
    ) -> Result<VoteWeight, GovernanceError> {
        let now = self.ledger.now();
        self.engine.cast_vote(
            id,
            voter,
            vote_type,
            reason,
            &self.ledger,
            &self.snapshots,
            &mut self.votes,
            now,
        )
    }

    /// The proposal's current state.
    pub fn state(&self, id: &ProposalId) -> Result<ProposalState, GovernanceError> {
        self.engine.state(id, self.ledger.now(), &self.votes)
    }

    /// The proposal's outcome, once its deadline has been reached.
    pub fn outcome(&self, id: &ProposalId) -> Result<ProposalState, GovernanceError> {
        self.engine.outcome(id, self.ledger.now(), &self.votes)
    }

    /// Execute a Succeeded proposal through the execution collaborator.
    pub fn execute<E: ActionExecutor>(
        &mut self,
        id: &ProposalId,
        executor: &mut E,
    ) -> Result<(), GovernanceError> {
        let now = self.ledger.now();
        self.engine.execute(id, executor, &self.votes, now)
    }

    // ── Read queries ───────────────────────────────────────────────────

    /// Voting start - the snapshot reference point. Callers advance the
    /// external clock to this instant to open voting.
    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Timestamp, GovernanceError> {
        self.engine.proposal_snapshot(id)
    }

    /// Voting deadline. Callers advance the external clock to this instant
    /// to close voting and fix the outcome.
    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Timestamp, GovernanceError> {
        self.engine.proposal_deadline(id)
    }

    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<&Address, GovernanceError> {
        self.engine.proposal_proposer(id)
    }

    /// The full proposal record.
    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.engine.proposal(id)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.votes.has_voted(id, voter)
    }

    /// The current tally for a proposal.
    pub fn tally(&self, id: &ProposalId) -> Result<Tally, GovernanceError> {
        // Surface UnknownProposal rather than a silent zero tally
        self.engine.proposal(id)?;
        Ok(self.votes.tally(id))
    }

    pub fn params(&self) -> &GovernorParams {
        self.engine.params()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Serialize the engine state (proposals, archive, votes) to bytes so a
    /// host process can persist it between ledger-ordered calls.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        let snapshot = GovernorSnapshot {
            engine: self.engine.clone(),
            votes: self.votes.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Restore a governor from serialized state, re-attaching the host
    /// ledger. The snapshot resolver is rebuilt from the stored proposals.
    pub fn load_state(data: &[u8], ledger: L) -> Result<Self, GovernanceError> {
        let snapshot: GovernorSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        let mut snapshots = SnapshotResolver::new();
        for proposal in snapshot.engine.live_proposals() {
            snapshots.bind(proposal.id, proposal.vote_start);
        }
        Ok(Self {
            ledger,
            engine: snapshot.engine,
            votes: snapshot.votes,
            snapshots,
        })
    }
}

/// Serializable snapshot of a governor's persistent state.
#[derive(Serialize, Deserialize)]
struct GovernorSnapshot {
    engine: ProposalEngine,
    votes: VoteLedger,
}
