use agora_ledger::{ExecutorError, LedgerError};
use agora_types::ProposalId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("proposal {0} with identical content already exists and is unresolved")]
    DuplicateProposal(ProposalId),

    #[error("a proposal must contain at least one action")]
    EmptyActionSet,

    #[error("a proposal must carry a non-empty description")]
    EmptyDescription,

    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("proposal {0} is not open for voting")]
    ProposalNotActive(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted {
        proposal: ProposalId,
        voter: String,
    },

    #[error("voting on proposal {0} is still open")]
    VotingStillOpen(ProposalId),

    #[error("proposal {0} has not succeeded")]
    NotSucceeded(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("action {index} of proposal {proposal} failed: {reason}")]
    ExecutionFailed {
        proposal: ProposalId,
        index: usize,
        reason: ExecutorError,
    },

    #[error("voting deadline overflows the timestamp range")]
    DeadlineOverflow,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("state snapshot error: {0}")]
    Snapshot(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
