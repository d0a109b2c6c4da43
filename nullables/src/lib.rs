//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external collaborators (clock, balance source, executor) are
//! abstracted behind the traits in `agora-ledger`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, prime failures)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod executor;
pub mod ledger;

pub use clock::NullClock;
pub use executor::NullExecutor;
pub use ledger::NullLedger;
