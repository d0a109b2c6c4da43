//! Proposal identity derivation.
//!
//! A proposal's id is a pure function of its content: Blake2b-256 over a
//! canonical, order-preserving encoding of every action field followed by the
//! description. Submitting identical content always yields the same id,
//! across calls and across process restarts; changing any field, or the
//! order of actions, yields a different id.
//!
//! Canonical encoding, hashed in sequence:
//!
//! ```text
//! "agora.proposal.v1"       domain separator
//! u32-le  action count
//! per action, in stored order:
//!   u32-le  target length, target bytes (UTF-8)
//!   4 bytes selector
//!   u32-le  input length, input bytes
//!   u128-le transferred value
//!   u64-le  gas limit
//! u32-le  description length, description bytes (UTF-8)
//! ```
//!
//! Variable-length fields are length-prefixed so adjacent fields can never
//! alias each other. No compatibility with any existing deployment's id
//! scheme is claimed.

use agora_types::{Action, ProposalId};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const DOMAIN: &[u8] = b"agora.proposal.v1";

/// Derive the proposal id for the given content.
pub fn proposal_id(actions: &[Action], description: &str) -> ProposalId {
    let mut hasher = Blake2b256::new();
    hasher.update(DOMAIN);
    hasher.update((actions.len() as u32).to_le_bytes());
    for action in actions {
        let target = action.target.as_str().as_bytes();
        hasher.update((target.len() as u32).to_le_bytes());
        hasher.update(target);
        hasher.update(action.selector.as_bytes());
        hasher.update((action.input.len() as u32).to_le_bytes());
        hasher.update(&action.input);
        hasher.update(action.transferred_value.to_le_bytes());
        hasher.update(action.gas_limit.to_le_bytes());
    }
    hasher.update((description.len() as u32).to_le_bytes());
    hasher.update(description.as_bytes());

    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    ProposalId::new(output)
}
