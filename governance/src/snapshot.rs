//! Snapshot resolution - binds proposals to a fixed voting-power reference
//! point.
//!
//! Each proposal is bound at creation to the timestamp at which its voting
//! starts; that instant is the reference point at which every voter's weight
//! is measured. The resolver is a read-only view over the host ledger - it
//! caches the reference point per proposal and nothing else.

use crate::error::GovernanceError;
use agora_ledger::Ledger;
use agora_types::{Address, ProposalId, Timestamp, VoteWeight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves a proposal's snapshot reference point and reads voting power
/// as of that point.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotResolver {
    reference_points: HashMap<ProposalId, Timestamp>,
}

impl SnapshotResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a proposal to its reference point. Called once at proposal
    /// creation; re-binding (a fresh lifecycle under the same id) replaces
    /// the old reference point.
    pub fn bind(&mut self, proposal: ProposalId, reference: Timestamp) {
        self.reference_points.insert(proposal, reference);
    }

    /// The reference point a proposal is bound to.
    pub fn resolve(&self, proposal: &ProposalId) -> Result<Timestamp, GovernanceError> {
        self.reference_points
            .get(proposal)
            .copied()
            .ok_or(GovernanceError::UnknownProposal(*proposal))
    }

    /// An account's voting power for a proposal: its balance as of exactly
    /// the proposal's reference point.
    ///
    /// Until the reference point is reached, voting power is undefined and
    /// the ledger's `FutureLookup` error propagates.
    pub fn voting_power<L: Ledger>(
        &self,
        ledger: &L,
        proposal: &ProposalId,
        account: &Address,
    ) -> Result<VoteWeight, GovernanceError> {
        let reference = self.resolve(proposal)?;
        Ok(ledger.balance_at(account, reference)?)
    }
}
