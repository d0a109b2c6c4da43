//! Governance engine for the Agora protocol.
//!
//! Manages the full lifecycle of collective decision-making proposals:
//! submission, a voting-power snapshot, a voting window, tallying, and a
//! deadline that finalizes the outcome.
//!
//! Key principles:
//! - Proposal ids are derived from content, never assigned.
//! - Voting weight is fixed at cast time from the proposal's snapshot
//!   reference point; later balance changes never count.
//! - Lifecycle state is recomputed from timestamps on every query instead
//!   of being advanced by triggers, so transitions cannot be missed.
//! - The engine is a single deterministic state object: time and balances
//!   come from the host ledger, execution goes through a collaborator.
//!
//! ## Module overview
//!
//! - [`identity`] - content-derived proposal ids.
//! - [`proposal`] - proposal records and derived lifecycle state.
//! - [`snapshot`] - snapshot reference points and voting-power reads.
//! - [`votes`] - the one-vote-per-voter ledger and tallying.
//! - [`engine`] - the proposal state machine.
//! - [`governor`] - the public facade composing the above.
//! - [`params`] - deployment configuration.
//! - [`error`] - governance error types.

pub mod engine;
pub mod error;
pub mod identity;
pub mod params;
pub mod proposal;
pub mod snapshot;
pub mod votes;

mod governor;

pub use engine::ProposalEngine;
pub use error::GovernanceError;
pub use governor::Governor;
pub use identity::proposal_id;
pub use params::GovernorParams;
pub use proposal::{Proposal, ProposalState, VoteType};
pub use snapshot::SnapshotResolver;
pub use votes::{Tally, Vote, VoteLedger};
