//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, proposal identifiers, actions, timestamps,
//! and voting weights.

pub mod action;
pub mod address;
pub mod id;
pub mod time;
pub mod weight;

pub use action::{Action, Selector};
pub use address::Address;
pub use id::ProposalId;
pub use time::Timestamp;
pub use weight::VoteWeight;
