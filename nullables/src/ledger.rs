//! Nullable ledger - a controllable time source and balance view.

use crate::clock::NullClock;
use agora_ledger::{BalanceHistory, Ledger, LedgerError};
use agora_types::{Address, Timestamp, VoteWeight};
use std::collections::HashMap;

/// An in-memory [`Ledger`] for testing.
///
/// Balances are checkpointed every time they are set, so historical lookups
/// behave exactly like a real chain: `balance_at` answers as of the requested
/// point, regardless of later changes. Accounts with no history have zero
/// balance.
pub struct NullLedger {
    clock: NullClock,
    balances: HashMap<Address, BalanceHistory>,
}

impl NullLedger {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            clock: NullClock::new(initial_secs),
            balances: HashMap::new(),
        }
    }

    /// Advance the clock by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.clock.advance(secs);
    }

    /// Set the clock to a specific time, e.g. a proposal's snapshot point
    /// or deadline.
    pub fn set_time(&self, ts: Timestamp) {
        self.clock.set(ts);
    }

    /// Set an account's balance as of the current clock time.
    pub fn set_balance(&mut self, account: impl Into<Address>, weight: VoteWeight) {
        let now = self.clock.now();
        self.balances
            .entry(account.into())
            .or_default()
            .record(now, weight);
    }
}

impl Ledger for NullLedger {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn balance_at(&self, account: &Address, at: Timestamp) -> Result<VoteWeight, LedgerError> {
        let current = self.clock.now();
        if at > current {
            return Err(LedgerError::FutureLookup {
                requested: at,
                current,
            });
        }
        Ok(self
            .balances
            .get(account)
            .map(|h| h.upper_lookup(at))
            .unwrap_or(VoteWeight::ZERO))
    }
}
