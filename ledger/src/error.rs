//! Collaborator error types.

use agora_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("balance lookup at {requested} is in the future (current time {current})")]
    FutureLookup {
        requested: Timestamp,
        current: Timestamp,
    },

    #[error("account not known to the ledger: {0}")]
    UnknownAccount(String),

    #[error("ledger backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("call to {target} reverted: {reason}")]
    CallReverted { target: String, reason: String },

    #[error("gas limit {limit} exceeded by call to {target}")]
    OutOfGas { target: String, limit: u64 },

    #[error("value transfer of {value} to {target} failed")]
    TransferFailed { target: String, value: u128 },
}
