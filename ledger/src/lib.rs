//! External collaborator interfaces for the Agora governance engine.
//!
//! The engine is a deterministic state object: it never reads a system clock
//! or holds balances of its own. Everything it needs from the outside world
//! comes through the traits in this crate:
//!
//! - [`Ledger`] - the authoritative time source and historical balance view.
//! - [`ActionExecutor`] - performs a proposal's external calls on success.
//!
//! The governance crate depends only on these traits; hosts plug in their
//! chain runtime, and tests plug in the deterministic doubles from
//! `agora-nullables`.

pub mod error;
pub mod executor;
pub mod history;

pub use error::{ExecutorError, LedgerError};
pub use executor::ActionExecutor;
pub use history::BalanceHistory;

use agora_types::{Address, Timestamp, VoteWeight};

/// Read-only view over the host ledger: current time and historical balances.
///
/// `balance_at` must answer "what was this account's balance as of exactly
/// this reference point" - never a later value. Asking about a point that is
/// still in the future is an error, because the answer is not yet fixed.
pub trait Ledger {
    /// The current time, as ordered by the host ledger.
    fn now(&self) -> Timestamp;

    /// The account's balance as of exactly `at`.
    ///
    /// Fails with [`LedgerError::FutureLookup`] if `at` is later than `now`.
    fn balance_at(&self, account: &Address, at: Timestamp) -> Result<VoteWeight, LedgerError>;
}
