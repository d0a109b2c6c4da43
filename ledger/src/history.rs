//! Append-only balance checkpoints with historical lookup.
//!
//! A [`BalanceHistory`] records an account's balance every time it changes,
//! keyed by timestamp. Historical queries then answer "what was the balance
//! as of time T" by binary search - the most recent checkpoint at or before
//! T wins. This is the structure backing snapshot voting power: a proposal's
//! reference point indexes into these histories, and balance changes after
//! the reference point never alter what the lookup returns.

use agora_types::{Timestamp, VoteWeight};
use serde::{Deserialize, Serialize};

/// One recorded balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// When the balance took effect.
    pub at: Timestamp,
    /// The balance from `at` onward, until the next checkpoint.
    pub balance: VoteWeight,
}

/// An account's balance history as an ordered checkpoint list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceHistory {
    checkpoints: Vec<Checkpoint>,
}

impl BalanceHistory {
    pub fn new() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }

    /// Record a balance change at `at`.
    ///
    /// Keys must arrive in non-decreasing order (ledger-ordered). Recording
    /// at the same timestamp as the latest checkpoint overwrites it - within
    /// one time unit only the final balance is observable. Returns the
    /// previous latest balance.
    pub fn record(&mut self, at: Timestamp, balance: VoteWeight) -> VoteWeight {
        let previous = self.latest();
        match self.checkpoints.last_mut() {
            // Same-key update, and out-of-order writes (a host-ledger bug)
            // clamped to the latest key so the list stays sorted.
            Some(last) if last.at >= at => {
                last.balance = balance;
            }
            _ => {
                self.checkpoints.push(Checkpoint { at, balance });
            }
        }
        previous
    }

    /// The balance in the most recent checkpoint, or zero if none.
    pub fn latest(&self) -> VoteWeight {
        self.checkpoints
            .last()
            .map(|c| c.balance)
            .unwrap_or(VoteWeight::ZERO)
    }

    /// The balance as of exactly `at`: the most recent checkpoint with
    /// `checkpoint.at <= at`, or zero if the account had no balance yet.
    pub fn upper_lookup(&self, at: Timestamp) -> VoteWeight {
        let idx = self.checkpoints.partition_point(|c| c.at <= at);
        if idx == 0 {
            VoteWeight::ZERO
        } else {
            self.checkpoints[idx - 1].balance
        }
    }

    /// Number of recorded checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}
