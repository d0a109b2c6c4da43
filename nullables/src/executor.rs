//! Nullable executor - records calls, fails on demand.

use agora_ledger::{ActionExecutor, ExecutorError};
use agora_types::Action;

/// A recording [`ActionExecutor`] for testing.
///
/// Every executed action lands in a pending batch; `commit` makes the batch
/// permanent, `rollback` discards it. Prime a failure with [`fail_at`] to
/// exercise the engine's atomicity path.
///
/// [`fail_at`]: NullExecutor::fail_at
#[derive(Default)]
pub struct NullExecutor {
    committed: Vec<Action>,
    pending: Vec<Action>,
    fail_at: Option<usize>,
    execute_calls: usize,
    rollbacks: usize,
}

impl NullExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next batch at the given action index (0-based).
    pub fn fail_at(&mut self, index: usize) {
        self.fail_at = Some(index);
    }

    /// Stop failing; subsequent batches succeed.
    pub fn clear_failure(&mut self) {
        self.fail_at = None;
    }

    /// Actions whose side effects were committed.
    pub fn committed(&self) -> &[Action] {
        &self.committed
    }

    /// Total number of `execute` calls, including failed and rolled-back ones.
    pub fn execute_calls(&self) -> usize {
        self.execute_calls
    }

    /// Number of times a batch was rolled back.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }
}

impl ActionExecutor for NullExecutor {
    fn begin(&mut self) {
        self.pending.clear();
    }

    fn execute(&mut self, action: &Action) -> Result<(), ExecutorError> {
        self.execute_calls += 1;
        if self.fail_at == Some(self.pending.len()) {
            return Err(ExecutorError::CallReverted {
                target: action.target.to_string(),
                reason: "primed failure".to_string(),
            });
        }
        self.pending.push(action.clone());
        Ok(())
    }

    fn commit(&mut self) {
        self.committed.append(&mut self.pending);
    }

    fn rollback(&mut self) {
        self.pending.clear();
        self.rollbacks += 1;
    }
}
