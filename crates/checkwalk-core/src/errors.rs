use thiserror::Error;

use crate::model::NodeId;

/// Result type alias using CheckwalkError
pub type Result<T> = std::result::Result<T, CheckwalkError>;

/// Result returned by condition rule collaborators
pub type RuleResult = std::result::Result<bool, RuleError>;

/// Result returned by task collaborators
pub type TaskResult = std::result::Result<(), TaskError>;

/// Failure raised by a condition rule that could not be applied
///
/// Rules report this when the review context is missing data they need or
/// their own configuration is malformed. A rule that evaluates cleanly to
/// `false` is not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    /// Create a new rule failure with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure raised by a task while mutating the review context
///
/// Whatever outcomes the task already recorded before failing stay on the
/// context. The engine performs no rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskError {
    message: String,
}

impl TaskError {
    /// Create a new task failure with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Comprehensive error taxonomy for Checkwalk operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckwalkError {
    // ===== Configuration Errors =====
    /// Node handle does not refer to a node in the tree
    #[error("unknown node handle {node_id}: tree has {size} nodes")]
    UnknownNode { node_id: NodeId, size: usize },

    /// Tree was built with no nodes
    #[error("tree has no nodes")]
    EmptyTree,

    /// Conditions were attached to a node that has no branch
    #[error("node {node} has no branch to attach conditions to")]
    BranchMissing { node: String },

    /// Walk ran longer than the configured step limit
    #[error("walk exceeded step limit {limit} at node {node}: tree may be cyclic")]
    StepLimitExceeded { node: String, limit: usize },

    // ===== Condition Evaluation Errors =====
    /// A condition's underlying rule could not be evaluated
    #[error("condition {condition_id} could not be evaluated at node {node}: {source}")]
    ConditionEvaluation {
        condition_id: String,
        node: String,
        #[source]
        source: RuleError,
    },

    // ===== Task Execution Errors =====
    /// A node's task failed while mutating the review context
    #[error("task {task_id} failed at node {node}: {source}")]
    TaskExecution {
        task_id: String,
        node: String,
        #[source]
        source: TaskError,
    },
}

impl CheckwalkError {
    /// Get the stable error code for this error
    ///
    /// Codes are part of the crate's contract: callers may match on them for
    /// programmatic handling and they appear in structured log events.
    pub fn code(&self) -> &'static str {
        match self {
            CheckwalkError::UnknownNode { .. } => "ERR_UNKNOWN_NODE",
            CheckwalkError::EmptyTree => "ERR_EMPTY_TREE",
            CheckwalkError::BranchMissing { .. } => "ERR_BRANCH_MISSING",
            CheckwalkError::StepLimitExceeded { .. } => "ERR_STEP_LIMIT_EXCEEDED",
            CheckwalkError::ConditionEvaluation { .. } => "ERR_CONDITION_EVALUATION",
            CheckwalkError::TaskExecution { .. } => "ERR_TASK_EXECUTION",
        }
    }

    /// Whether this error reflects a misconfigured tree rather than a
    /// collaborator failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CheckwalkError::UnknownNode { .. }
                | CheckwalkError::EmptyTree
                | CheckwalkError::BranchMissing { .. }
                | CheckwalkError::StepLimitExceeded { .. }
        )
    }
}
