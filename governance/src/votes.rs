//! Vote ledger - one vote per (proposal, voter), tallied on demand.

use crate::error::GovernanceError;
use crate::params::{GovernorParams, BPS_DENOMINATOR};
use crate::proposal::VoteType;
use agora_types::{Address, ProposalId, VoteWeight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recorded vote. Never mutated or deleted once cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: Address,
    pub vote_type: VoteType,
    /// Weight captured at cast time from the proposal's snapshot reference
    /// point. Later balance changes never alter it.
    pub weight: VoteWeight,
    /// Optional free-form justification supplied by the voter.
    pub reason: Option<String>,
}

/// Aggregate weight per vote type for one proposal.
///
/// Derived, not stored: recomputed from the vote set on demand. Defined even
/// with zero votes (all-zero tally).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_weight: VoteWeight,
    pub against_weight: VoteWeight,
    pub abstain_weight: VoteWeight,
}

impl Tally {
    /// Total participating weight, across all three vote types.
    pub fn total(&self) -> VoteWeight {
        self.for_weight
            .saturating_add(self.against_weight)
            .saturating_add(self.abstain_weight)
    }

    /// Whether total participation reaches the quorum threshold.
    pub fn meets_quorum(&self, threshold: VoteWeight) -> bool {
        self.total() >= threshold
    }

    /// Whether the For side carries the vote under the configured majority
    /// rule: `for * 10000 > (for + against) * supermajority_bps`. Abstain
    /// weight counts toward quorum but not toward the majority.
    pub fn has_majority(&self, supermajority_bps: u32) -> bool {
        let bps = supermajority_bps as u128;
        let decisive = self
            .for_weight
            .saturating_add(self.against_weight)
            .raw();
        // `for * 10000 > decisive * bps` evaluated without forming either
        // product, since `decisive * bps` can exceed u128. Splitting decisive
        // into quotient and remainder by the denominator gives the exact
        // floor of `decisive * bps / 10000`, and comparing the For weight
        // against that floor is equivalent to the cross-product comparison.
        let threshold = decisive / BPS_DENOMINATOR * bps
            + decisive % BPS_DENOMINATOR * bps / BPS_DENOMINATOR;
        self.for_weight.raw() > threshold
    }

    /// Whether the tally passes both the quorum and majority rules.
    pub fn passes(&self, params: &GovernorParams) -> bool {
        self.meets_quorum(VoteWeight::new(params.quorum_threshold))
            && self.has_majority(params.supermajority_bps)
    }
}

/// Records votes and aggregates tallies.
///
/// Votes are keyed by (proposal, voter) - a voter casts at most one vote per
/// proposal lifecycle. When a resolved proposal is re-proposed under the
/// same id, its votes move to the audit archive and the new lifecycle starts
/// with an empty vote set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    votes: HashMap<ProposalId, HashMap<Address, Vote>>,
    /// Votes of superseded lifecycles, retained for audit.
    archived: Vec<(ProposalId, HashMap<Address, Vote>)>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote. Fails with `AlreadyVoted` if this voter already voted
    /// on this proposal; the existing vote is left untouched.
    pub fn record(&mut self, proposal: ProposalId, vote: Vote) -> Result<(), GovernanceError> {
        let entry = self.votes.entry(proposal).or_default();
        if entry.contains_key(&vote.voter) {
            return Err(GovernanceError::AlreadyVoted {
                proposal,
                voter: vote.voter.to_string(),
            });
        }
        entry.insert(vote.voter.clone(), vote);
        Ok(())
    }

    /// Whether this voter has voted on this proposal's current lifecycle.
    pub fn has_voted(&self, proposal: &ProposalId, voter: &Address) -> bool {
        self.votes
            .get(proposal)
            .map(|v| v.contains_key(voter))
            .unwrap_or(false)
    }

    /// This voter's vote on this proposal, if any.
    pub fn get(&self, proposal: &ProposalId, voter: &Address) -> Option<&Vote> {
        self.votes.get(proposal).and_then(|v| v.get(voter))
    }

    /// Aggregate the tally for a proposal. All-zero if nobody voted.
    pub fn tally(&self, proposal: &ProposalId) -> Tally {
        let mut tally = Tally::default();
        if let Some(votes) = self.votes.get(proposal) {
            for vote in votes.values() {
                let slot = match vote.vote_type {
                    VoteType::For => &mut tally.for_weight,
                    VoteType::Against => &mut tally.against_weight,
                    VoteType::Abstain => &mut tally.abstain_weight,
                };
                *slot = slot.saturating_add(vote.weight);
            }
        }
        tally
    }

    /// Number of votes cast on a proposal's current lifecycle.
    pub fn vote_count(&self, proposal: &ProposalId) -> usize {
        self.votes.get(proposal).map(|v| v.len()).unwrap_or(0)
    }

    /// Move a proposal's live votes to the audit archive. Called when a
    /// resolved proposal is superseded by a fresh lifecycle under the same
    /// id.
    pub fn archive(&mut self, proposal: &ProposalId) {
        if let Some(votes) = self.votes.remove(proposal) {
            self.archived.push((*proposal, votes));
        }
    }

    /// Number of archived lifecycles (audit query).
    pub fn archived_count(&self) -> usize {
        self.archived.len()
    }
}
