//! Execution collaborator trait.

use crate::error::ExecutorError;
use agora_types::Action;

/// Performs a proposal's external calls once it has succeeded.
///
/// Execution is transactional: the engine brackets a proposal's actions with
/// `begin` and `commit`, invoking `execute` once per action in the stored
/// order. If any action fails the engine calls `rollback` instead, and the
/// implementation must discard every side effect of the actions already
/// executed in that batch. The proposal then stays `Succeeded` and the whole
/// batch may be retried later.
pub trait ActionExecutor {
    /// Start a new execution batch.
    fn begin(&mut self) {}

    /// Perform one external call.
    fn execute(&mut self, action: &Action) -> Result<(), ExecutorError>;

    /// Make the current batch's side effects permanent.
    fn commit(&mut self) {}

    /// Discard all side effects of the current batch.
    fn rollback(&mut self);
}
