//! Governor configuration with TOML file support.
//!
//! All parameters are fixed when the engine is constructed and immutable for
//! the lifetime of a deployment.

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Basis-point denominator for the majority rule.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Configuration for a [`Governor`](crate::Governor) deployment.
///
/// Can be loaded from a TOML file via [`GovernorParams::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorParams {
    /// Seconds between proposal creation and voting start. Voting power is
    /// snapshotted at voting start.
    #[serde(default = "default_voting_delay")]
    pub voting_delay_secs: u64,

    /// Seconds the voting window stays open.
    #[serde(default = "default_voting_period")]
    pub voting_period_secs: u64,

    /// Minimum aggregate weight (for + against + abstain) for a valid
    /// outcome. Zero disables the quorum check.
    #[serde(default)]
    pub quorum_threshold: u128,

    /// Share of the decisive (for + against) weight the For side must
    /// strictly exceed, in basis points. 5000 is a simple majority
    /// (for > against); larger values demand a supermajority.
    #[serde(default = "default_supermajority_bps")]
    pub supermajority_bps: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_delay() -> u64 {
    3_600
}

fn default_voting_period() -> u64 {
    259_200
}

fn default_supermajority_bps() -> u32 {
    5_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernorParams {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let params: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Check the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_period_secs == 0 {
            return Err(GovernanceError::Config(
                "voting_period_secs must be non-zero".to_string(),
            ));
        }
        if !(5_000..=10_000).contains(&self.supermajority_bps) {
            return Err(GovernanceError::Config(format!(
                "supermajority_bps must be between 5000 and 10000, got {}",
                self.supermajority_bps
            )));
        }
        Ok(())
    }
}

impl Default for GovernorParams {
    fn default() -> Self {
        Self {
            voting_delay_secs: default_voting_delay(),
            voting_period_secs: default_voting_period(),
            quorum_threshold: 0,
            supermajority_bps: default_supermajority_bps(),
        }
    }
}
