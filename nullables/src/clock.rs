//! Manually driven clock for tests.

use agora_types::Timestamp;
use std::cell::Cell;

/// A clock that only moves when told to.
///
/// Lives inside [`NullLedger`](crate::NullLedger) behind a shared borrow:
/// interior mutability lets tests move time underneath an engine that holds
/// the ledger, the same way chain time moves underneath a deployed governor.
/// Jumping straight to a proposal's snapshot point or deadline is the
/// primary use.
pub struct NullClock {
    now: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            now: Cell::new(Timestamp::new(initial_secs)),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    /// Move time forward by `secs`.
    pub fn advance(&self, secs: u64) {
        let current = self.now.get();
        self.now
            .set(Timestamp::new(current.as_secs().saturating_add(secs)));
    }

    /// Jump to `ts`, forward or backward.
    pub fn set(&self, ts: Timestamp) {
        self.now.set(ts);
    }
}
