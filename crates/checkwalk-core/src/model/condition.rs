//! Conditions and their rule collaborator interface
//!
//! A condition is a named predicate over the review context. The rule behind
//! it is opaque to the engine: all the engine needs is boolean-or-failure.

use std::fmt;
use std::sync::Arc;

use crate::errors::{RuleError, RuleResult};
use crate::model::ReviewContext;

/// Predicate collaborator evaluated against the review context
pub trait ConditionRule: Send + Sync {
    /// Evaluate the predicate
    ///
    /// # Errors
    ///
    /// Returns `RuleError` when the predicate cannot be applied, e.g. the
    /// context is missing data the rule needs.
    fn test(&self, ctx: &ReviewContext) -> RuleResult;
}

/// Rule that always evaluates true
///
/// Useful as an unconditional edge in a tree and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl ConditionRule for AlwaysTrue {
    fn test(&self, _ctx: &ReviewContext) -> RuleResult {
        Ok(true)
    }
}

/// Rule that always evaluates false
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFalse;

impl ConditionRule for AlwaysFalse {
    fn test(&self, _ctx: &ReviewContext) -> RuleResult {
        Ok(false)
    }
}

/// A named condition: stable identifier plus an evaluation rule
///
/// Created once when the tree is built, immutable thereafter, shared
/// read-only across all walks of the tree.
#[derive(Clone)]
pub struct Condition {
    id: String,
    rule: Arc<dyn ConditionRule>,
}

impl Condition {
    /// Create a new condition
    pub fn new(id: impl Into<String>, rule: Arc<dyn ConditionRule>) -> Self {
        Self {
            id: id.into(),
            rule,
        }
    }

    /// Get the condition identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Evaluate the condition against the context
    ///
    /// # Errors
    ///
    /// Forwards the rule's `RuleError` unchanged.
    pub fn evaluate(&self, ctx: &ReviewContext) -> RuleResult {
        self.rule.test(ctx)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("id", &self.id).finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.id)
    }
}
