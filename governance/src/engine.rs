//! Proposal state machine - owns proposal records, enforces transitions,
//! computes outcomes.
//!
//! Transitions are pulled, not pushed: every query recomputes the state from
//! the stored timestamps and the caller-supplied clock instead of advancing
//! a stored field. Only execution is a true stored flag, since it is not a
//! function of time. The valid transition order is
//! Pending → Active → {Succeeded, Defeated} → (Succeeded only) Executed,
//! and nothing ever reverses.

use crate::error::GovernanceError;
use crate::identity;
use crate::params::GovernorParams;
use crate::proposal::{Proposal, ProposalState, VoteType};
use crate::snapshot::SnapshotResolver;
use crate::votes::{Vote, VoteLedger};
use agora_ledger::{ActionExecutor, Ledger};
use agora_types::{Action, Address, ProposalId, Timestamp, VoteWeight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Owns every proposal record and drives the lifecycle.
///
/// The engine holds no clock and no balances: `now` is passed into every
/// operation by the caller (one call per ledger-ordered transaction), and
/// voting power is read through the [`SnapshotResolver`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalEngine {
    params: GovernorParams,
    proposals: HashMap<ProposalId, Proposal>,
    /// Superseded records, retained for audit.
    archive: Vec<Proposal>,
}

impl ProposalEngine {
    pub fn new(params: GovernorParams) -> Result<Self, GovernanceError> {
        params.validate()?;
        Ok(Self {
            params,
            proposals: HashMap::new(),
            archive: Vec::new(),
        })
    }

    pub fn params(&self) -> &GovernorParams {
        &self.params
    }

    /// Submit a new proposal.
    ///
    /// The id is derived from the content, so identical content maps to the
    /// same id: while an earlier submission is unresolved the new one is
    /// rejected as a duplicate; once it is resolved (Defeated or Executed),
    /// the old record and its votes move to the audit archive and a fresh
    /// lifecycle starts under the same id.
    pub fn propose(
        &mut self,
        actions: Vec<Action>,
        description: String,
        proposer: Address,
        now: Timestamp,
        votes: &mut VoteLedger,
    ) -> Result<ProposalId, GovernanceError> {
        if actions.is_empty() {
            return Err(GovernanceError::EmptyActionSet);
        }

        let id = identity::proposal_id(&actions, &description);

        if let Some(existing) = self.proposals.remove(&id) {
            let passed = votes.tally(&id).passes(&self.params);
            if !existing.is_resolved(now, passed) {
                self.proposals.insert(id, existing);
                return Err(GovernanceError::DuplicateProposal(id));
            }
            self.archive.push(existing);
            votes.archive(&id);
        }

        let vote_start = now
            .checked_add_secs(self.params.voting_delay_secs)
            .ok_or(GovernanceError::DeadlineOverflow)?;
        let deadline = vote_start
            .checked_add_secs(self.params.voting_period_secs)
            .ok_or(GovernanceError::DeadlineOverflow)?;

        let proposal = Proposal {
            id,
            proposer: proposer.clone(),
            actions,
            description,
            created_at: now,
            vote_start,
            deadline,
            executed: false,
        };
        self.proposals.insert(id, proposal);

        tracing::info!(
            proposal = %id,
            proposer = %proposer,
            vote_start = %vote_start,
            deadline = %deadline,
            "proposal created"
        );

        Ok(id)
    }

    /// The proposal's current state, derived from `now` and the tally.
    pub fn state(
        &self,
        id: &ProposalId,
        now: Timestamp,
        votes: &VoteLedger,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.proposal(id)?;
        Ok(proposal.state_at(now, votes.tally(id).passes(&self.params)))
    }

    /// Cast a vote on an Active proposal.
    ///
    /// The voter's weight is read via the snapshot resolver as of the
    /// proposal's reference point and fixed into the recorded vote. Returns
    /// the weight used.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote<L: Ledger>(
        &self,
        id: &ProposalId,
        voter: Address,
        vote_type: VoteType,
        reason: Option<String>,
        ledger: &L,
        snapshots: &SnapshotResolver,
        votes: &mut VoteLedger,
        now: Timestamp,
    ) -> Result<VoteWeight, GovernanceError> {
        if self.state(id, now, votes)? != ProposalState::Active {
            return Err(GovernanceError::ProposalNotActive(*id));
        }

        let weight = snapshots.voting_power(ledger, id, &voter)?;
        votes.record(
            *id,
            Vote {
                voter: voter.clone(),
                vote_type,
                weight,
                reason,
            },
        )?;

        tracing::debug!(
            proposal = %id,
            voter = %voter,
            ?vote_type,
            weight = %weight,
            "vote recorded"
        );

        Ok(weight)
    }

    /// Resolve the outcome once the deadline has been reached.
    ///
    /// Returns `Succeeded` or `Defeated`; fails with `VotingStillOpen` while
    /// the deadline lies ahead.
    pub fn outcome(
        &self,
        id: &ProposalId,
        now: Timestamp,
        votes: &VoteLedger,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.proposal(id)?;
        if now < proposal.deadline {
            return Err(GovernanceError::VotingStillOpen(*id));
        }
        if proposal.executed || votes.tally(id).passes(&self.params) {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    /// Execute a Succeeded proposal's actions, in stored order.
    ///
    /// Execution is atomic: if any action fails, the executor rolls the
    /// batch back, nothing is marked executed, and the proposal stays
    /// Succeeded so the call can be retried. The executed flag is set only
    /// after every action went through.
    pub fn execute<E: ActionExecutor>(
        &mut self,
        id: &ProposalId,
        executor: &mut E,
        votes: &VoteLedger,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let state = self.state(id, now, votes)?;
        if state == ProposalState::Executed {
            return Err(GovernanceError::AlreadyExecuted(*id));
        }
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::NotSucceeded(*id));
        }

        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;

        executor.begin();
        for (index, action) in proposal.actions.iter().enumerate() {
            if let Err(reason) = executor.execute(action) {
                executor.rollback();
                tracing::warn!(
                    proposal = %id,
                    index,
                    %reason,
                    "execution failed, batch rolled back"
                );
                return Err(GovernanceError::ExecutionFailed {
                    proposal: *id,
                    index,
                    reason,
                });
            }
        }
        executor.commit();
        proposal.executed = true;

        tracing::info!(proposal = %id, actions = proposal.actions.len(), "proposal executed");

        Ok(())
    }

    /// Look up a proposal record.
    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(*id))
    }

    /// When voting starts - the snapshot reference point.
    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Timestamp, GovernanceError> {
        Ok(self.proposal(id)?.vote_start)
    }

    /// When voting ends.
    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Timestamp, GovernanceError> {
        Ok(self.proposal(id)?.deadline)
    }

    /// Who proposed it.
    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<&Address, GovernanceError> {
        Ok(&self.proposal(id)?.proposer)
    }

    /// All live proposals, in no particular order.
    pub fn live_proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Superseded records retained for audit.
    pub fn archived(&self) -> &[Proposal] {
        &self.archive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::{NullExecutor, NullLedger};

    fn params() -> GovernorParams {
        GovernorParams {
            voting_delay_secs: 100,
            voting_period_secs: 200,
            quorum_threshold: 50,
            supermajority_bps: 5_000,
        }
    }

    fn actions() -> Vec<Action> {
        vec![Action::call("treasury", [1, 2, 3, 4], 1_000_000)]
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    /// Engine plus collaborators, wired the way the facade does it.
    struct Fixture {
        engine: ProposalEngine,
        votes: VoteLedger,
        snapshots: SnapshotResolver,
        ledger: NullLedger,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ledger = NullLedger::new(1_000);
            ledger.set_balance("alice", VoteWeight::new(100));
            ledger.set_balance("bob", VoteWeight::new(40));
            ledger.set_balance("carol", VoteWeight::new(10));
            Self {
                engine: ProposalEngine::new(params()).unwrap(),
                votes: VoteLedger::new(),
                snapshots: SnapshotResolver::new(),
                ledger,
            }
        }

        fn propose(&mut self, description: &str) -> ProposalId {
            let id = self
                .engine
                .propose(
                    actions(),
                    description.to_string(),
                    Address::new("proposer"),
                    self.ledger.now(),
                    &mut self.votes,
                )
                .unwrap();
            let reference = self.engine.proposal_snapshot(&id).unwrap();
            self.snapshots.bind(id, reference);
            id
        }

        fn vote(&mut self, id: &ProposalId, name: &str, vote_type: VoteType) -> Result<VoteWeight, GovernanceError> {
            self.engine.cast_vote(
                id,
                Address::new(name),
                vote_type,
                None,
                &self.ledger,
                &self.snapshots,
                &mut self.votes,
                self.ledger.now(),
            )
        }

        fn state(&self, id: &ProposalId) -> ProposalState {
            self.engine.state(id, self.ledger.now(), &self.votes).unwrap()
        }
    }

    #[test]
    fn empty_action_set_rejected() {
        let mut fx = Fixture::new();
        let err = fx
            .engine
            .propose(
                Vec::new(),
                "x".to_string(),
                Address::new("proposer"),
                ts(1_000),
                &mut fx.votes,
            )
            .unwrap_err();
        assert_eq!(err, GovernanceError::EmptyActionSet);
    }

    #[test]
    fn lifecycle_pending_then_active() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");

        assert_eq!(fx.state(&id), ProposalState::Pending);
        // Advance to exactly the vote start: voting opens
        fx.ledger.advance(100);
        assert_eq!(fx.state(&id), ProposalState::Active);
    }

    #[test]
    fn vote_rejected_while_pending() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        let err = fx.vote(&id, "alice", VoteType::For).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotActive(id));
    }

    #[test]
    fn vote_rejected_after_deadline() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(300); // at the deadline
        let err = fx.vote(&id, "alice", VoteType::For).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotActive(id));
    }

    #[test]
    fn vote_weight_comes_from_snapshot() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);

        // Alice's balance changes after the snapshot point: irrelevant
        fx.ledger.advance(50);
        fx.ledger.set_balance("alice", VoteWeight::new(1));

        let weight = fx.vote(&id, "alice", VoteType::For).unwrap();
        assert_eq!(weight, VoteWeight::new(100));
    }

    #[test]
    fn double_vote_rejected() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();

        let err = fx.vote(&id, "alice", VoteType::Against).unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));
        // The original vote is untouched
        let stored = fx.votes.get(&id, &Address::new("alice")).unwrap();
        assert_eq!(stored.vote_type, VoteType::For);
    }

    #[test]
    fn outcome_succeeds_with_quorum_and_majority() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap(); // 100
        fx.vote(&id, "bob", VoteType::Against).unwrap(); // 40

        // Deadline not reached yet
        let err = fx.engine.outcome(&id, fx.ledger.now(), &fx.votes).unwrap_err();
        assert_eq!(err, GovernanceError::VotingStillOpen(id));

        fx.ledger.advance(200);
        // 140 >= 50 quorum, 100 > 40 majority
        assert_eq!(
            fx.engine.outcome(&id, fx.ledger.now(), &fx.votes).unwrap(),
            ProposalState::Succeeded
        );
        assert_eq!(fx.state(&id), ProposalState::Succeeded);
    }

    #[test]
    fn outcome_defeated_without_quorum() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "carol", VoteType::Against).unwrap(); // 10 < 50 quorum
        fx.ledger.advance(200);

        assert_eq!(
            fx.engine.outcome(&id, fx.ledger.now(), &fx.votes).unwrap(),
            ProposalState::Defeated
        );
    }

    #[test]
    fn no_votes_resolves_to_defeated_at_deadline() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(300);
        assert_eq!(fx.state(&id), ProposalState::Defeated);
    }

    #[test]
    fn execute_runs_actions_and_sets_flag() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();
        fx.ledger.advance(200);

        let mut exec = NullExecutor::new();
        fx.engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap();

        assert_eq!(exec.committed().len(), 1);
        assert_eq!(fx.state(&id), ProposalState::Executed);
    }

    #[test]
    fn execute_rejected_unless_succeeded() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        let mut exec = NullExecutor::new();

        // Pending
        let err = fx
            .engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap_err();
        assert_eq!(err, GovernanceError::NotSucceeded(id));

        // Defeated
        fx.ledger.advance(300);
        let err = fx
            .engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap_err();
        assert_eq!(err, GovernanceError::NotSucceeded(id));
        assert_eq!(exec.execute_calls(), 0);
    }

    #[test]
    fn second_execute_rejected_without_further_calls() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();
        fx.ledger.advance(200);

        let mut exec = NullExecutor::new();
        fx.engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap();
        let calls = exec.execute_calls();

        let err = fx
            .engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyExecuted(id));
        assert_eq!(exec.execute_calls(), calls);
    }

    #[test]
    fn failed_execution_rolls_back_and_stays_succeeded() {
        let mut fx = Fixture::new();
        let id = fx
            .engine
            .propose(
                vec![
                    Action::call("a", [1, 1, 1, 1], 1_000),
                    Action::call("b", [2, 2, 2, 2], 1_000),
                ],
                "two actions".to_string(),
                Address::new("proposer"),
                fx.ledger.now(),
                &mut fx.votes,
            )
            .unwrap();
        fx.snapshots.bind(id, fx.engine.proposal_snapshot(&id).unwrap());
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();
        fx.ledger.advance(200);

        let mut exec = NullExecutor::new();
        exec.fail_at(1);
        let err = fx
            .engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::ExecutionFailed { index: 1, .. }
        ));
        assert!(exec.committed().is_empty());
        assert_eq!(exec.rollbacks(), 1);
        assert_eq!(fx.state(&id), ProposalState::Succeeded);

        // Retry succeeds once the failure clears
        exec.clear_failure();
        fx.engine
            .execute(&id, &mut exec, &fx.votes, fx.ledger.now())
            .unwrap();
        assert_eq!(exec.committed().len(), 2);
        assert_eq!(fx.state(&id), ProposalState::Executed);
    }

    #[test]
    fn duplicate_rejected_while_unresolved() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");

        // Pending
        let err = fx
            .engine
            .propose(
                actions(),
                "Upgrade treasury".to_string(),
                Address::new("other-proposer"),
                fx.ledger.now(),
                &mut fx.votes,
            )
            .unwrap_err();
        assert_eq!(err, GovernanceError::DuplicateProposal(id));

        // Active
        fx.ledger.advance(100);
        assert!(matches!(
            fx.engine.propose(
                actions(),
                "Upgrade treasury".to_string(),
                Address::new("proposer"),
                fx.ledger.now(),
                &mut fx.votes,
            ),
            Err(GovernanceError::DuplicateProposal(_))
        ));
    }

    #[test]
    fn duplicate_rejected_while_succeeded_unexecuted() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();
        fx.ledger.advance(200);
        assert_eq!(fx.state(&id), ProposalState::Succeeded);

        assert!(matches!(
            fx.engine.propose(
                actions(),
                "Upgrade treasury".to_string(),
                Address::new("proposer"),
                fx.ledger.now(),
                &mut fx.votes,
            ),
            Err(GovernanceError::DuplicateProposal(_))
        ));
    }

    #[test]
    fn repropose_after_defeat_starts_fresh_lifecycle() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "carol", VoteType::Against).unwrap();
        fx.ledger.advance(200);
        assert_eq!(fx.state(&id), ProposalState::Defeated);

        let id2 = fx.propose("Upgrade treasury");
        assert_eq!(id, id2); // same content, same id

        // Fresh lifecycle: Pending again, old votes archived
        assert_eq!(fx.state(&id2), ProposalState::Pending);
        assert_eq!(fx.votes.vote_count(&id2), 0);
        assert_eq!(fx.votes.archived_count(), 1);
        assert_eq!(fx.engine.archived().len(), 1);

        // Carol can vote again in the new lifecycle
        fx.ledger.advance(100);
        fx.vote(&id2, "carol", VoteType::For).unwrap();
    }

    #[test]
    fn unknown_proposal_everywhere() {
        let fx = Fixture::new();
        let ghost = ProposalId::new([9; 32]);
        assert_eq!(
            fx.engine.state(&ghost, ts(0), &fx.votes).unwrap_err(),
            GovernanceError::UnknownProposal(ghost)
        );
        assert_eq!(
            fx.engine.outcome(&ghost, ts(0), &fx.votes).unwrap_err(),
            GovernanceError::UnknownProposal(ghost)
        );
        assert!(fx.engine.proposal_snapshot(&ghost).is_err());
        assert!(fx.engine.proposal_deadline(&ghost).is_err());
        assert!(fx.engine.proposal_proposer(&ghost).is_err());
    }

    #[test]
    fn rejected_operations_leave_state_unchanged() {
        let mut fx = Fixture::new();
        let id = fx.propose("Upgrade treasury");
        fx.ledger.advance(100);
        fx.vote(&id, "alice", VoteType::For).unwrap();

        let before = fx.votes.tally(&id);
        let _ = fx.vote(&id, "alice", VoteType::Against);
        assert_eq!(fx.votes.tally(&id), before);
        assert_eq!(fx.votes.vote_count(&id), 1);
    }

    #[test]
    fn deadline_overflow_detected() {
        let mut fx = Fixture::new();
        let err = fx
            .engine
            .propose(
                actions(),
                "x".to_string(),
                Address::new("proposer"),
                Timestamp::new(u64::MAX - 50),
                &mut fx.votes,
            )
            .unwrap_err();
        assert_eq!(err, GovernanceError::DeadlineOverflow);
    }
}
