//! Proposal actions - the external calls a proposal executes on success.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 4-byte call selector identifying the operation on the target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector([u8; 4]);

impl Selector {
    pub fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Selector({:02x}{:02x}{:02x}{:02x})",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// One unit of work a successful proposal performs: a single call against an
/// external target.
///
/// Immutable once embedded in a proposal - every field participates in the
/// proposal id derivation, so changing any of them produces a different
/// proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The account the call is addressed to.
    pub target: Address,
    /// Which operation on the target to invoke.
    pub selector: Selector,
    /// Encoded input values for the call, in argument order.
    pub input: Vec<u8>,
    /// Value transferred with the call, in the ledger's base denomination.
    pub transferred_value: u128,
    /// Resource-consumption ceiling for the call.
    pub gas_limit: u64,
}

impl Action {
    /// Create an action with no input, no transferred value, and the given
    /// gas ceiling.
    pub fn call(target: impl Into<Address>, selector: [u8; 4], gas_limit: u64) -> Self {
        Self {
            target: target.into(),
            selector: Selector::new(selector),
            input: Vec::new(),
            transferred_value: 0,
            gas_limit,
        }
    }
}
