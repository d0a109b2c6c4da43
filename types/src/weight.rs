//! Voting weight type.
//!
//! Weights are fixed-point integers (u128) to avoid floating-point errors.
//! The engine never interprets the unit - it is whatever balance denomination
//! the host ledger reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// An account's voting weight, as reported by the host ledger at a proposal's
/// snapshot reference point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoteWeight(u128);

impl VoteWeight {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for VoteWeight {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for VoteWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weight() {
        assert!(VoteWeight::ZERO.is_zero());
        assert!(!VoteWeight::new(1).is_zero());
    }

    #[test]
    fn checked_add_detects_overflow() {
        let a = VoteWeight::new(u128::MAX);
        assert_eq!(a.checked_add(VoteWeight::new(1)), None);
        assert_eq!(
            VoteWeight::new(40).checked_add(VoteWeight::new(2)),
            Some(VoteWeight::new(42))
        );
    }

    #[test]
    fn saturating_add_caps() {
        let a = VoteWeight::new(u128::MAX);
        assert_eq!(a.saturating_add(VoteWeight::new(5)), a);
    }
}
