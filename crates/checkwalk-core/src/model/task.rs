//! Task collaborator interface
//!
//! Tasks are the units of work attached to a node. The engine only sequences
//! them; what a task actually does (invoke a validation service, transform
//! the subject, record outcomes) is the collaborator's business.

use crate::errors::{TaskError, TaskResult};
use crate::model::ReviewContext;

/// An opaque unit of work executed against the review context
///
/// Implementations are shared read-only across walks, so any internal state
/// must be interior-mutable and thread-safe.
pub trait Task: Send + Sync {
    /// Stable identifier, used for diagnostics and error tagging
    fn id(&self) -> &str;

    /// Perform the work, mutating the context as a side effect
    ///
    /// # Errors
    ///
    /// Returns `TaskError` when the work could not be carried out. Whatever
    /// the task already recorded on the context stays recorded.
    fn run(&self, ctx: &mut ReviewContext) -> TaskResult;
}
