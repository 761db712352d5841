//! Tree nodes and their arena handles

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{CheckwalkError, Result};
use crate::model::{Branch, ReviewContext, Task};

/// Handle identifying a node inside a [`CheckTree`](crate::tree::CheckTree) arena
///
/// Handles are plain indices: cheap to copy, and two branches may hold the
/// same handle to share a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the arena index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// A tree vertex: an ordered task sequence plus an optional branch
///
/// A node with no branch is terminal. Nodes are created during tree assembly
/// and read-only during walks.
pub struct Node {
    label: String,
    tasks: Vec<Arc<dyn Task>>,
    branch: Option<Branch>,
}

impl Node {
    /// Create an empty node with the given diagnostic label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tasks: Vec::new(),
            branch: None,
        }
    }

    /// Get the diagnostic label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the ordered task sequence
    pub fn tasks(&self) -> &[Arc<dyn Task>] {
        &self.tasks
    }

    /// Get the branch, if present
    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    /// Whether this node ends a walk
    pub fn is_terminal(&self) -> bool {
        self.branch.is_none()
    }

    pub(crate) fn push_task(&mut self, task: Arc<dyn Task>) {
        self.tasks.push(task);
    }

    pub(crate) fn set_branch(&mut self, branch: Branch) {
        self.branch = Some(branch);
    }

    pub(crate) fn branch_mut(&mut self) -> Option<&mut Branch> {
        self.branch.as_mut()
    }

    /// Run every task in order against the context
    ///
    /// Each task mutates the context as a side effect. A task failure stops
    /// the remaining tasks of this node; mutations already applied stay on
    /// the context.
    ///
    /// Returns whether this node has a branch to consult next.
    ///
    /// # Errors
    ///
    /// Returns `TaskExecution` tagged with the task id and this node's label.
    pub fn execute(&self, ctx: &mut ReviewContext) -> Result<bool> {
        for task in &self.tasks {
            tracing::debug!(
                node = self.label.as_str(),
                task_id = task.id(),
                "running task"
            );
            task.run(ctx).map_err(|source| CheckwalkError::TaskExecution {
                task_id: task.id().to_string(),
                node: self.label.clone(),
                source,
            })?;
        }
        Ok(self.branch.is_some())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("label", &self.label)
            .field("tasks", &self.tasks.len())
            .field("terminal", &self.is_terminal())
            .finish()
    }
}
