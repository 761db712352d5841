//! Branch decisions: a disjunction of conditions over two child handles

use std::fmt;

use crate::errors::{CheckwalkError, Result};
use crate::model::{Condition, NodeId, ReviewContext};

/// A decision point: ordered conditions plus the two child handles
///
/// Both children are always present. A branch assembled without an explicit
/// child for one arm gets a builder-allocated empty terminal node there, so
/// the walker never has to null-check a child.
#[derive(Debug, Clone)]
pub struct Branch {
    conditions: Vec<Condition>,
    on_true: NodeId,
    on_false: NodeId,
}

impl Branch {
    /// Create a branch with no conditions yet
    pub fn new(on_true: NodeId, on_false: NodeId) -> Self {
        Self {
            conditions: Vec::new(),
            on_true,
            on_false,
        }
    }

    /// Conditions in evaluation order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Child taken when the disjunction is true
    pub fn on_true(&self) -> NodeId {
        self.on_true
    }

    /// Child taken when the disjunction is false
    pub fn on_false(&self) -> NodeId {
        self.on_false
    }

    pub(crate) fn push_condition(&mut self, condition: Condition) {
        tracing::debug!(condition_id = condition.id(), "adding condition to branch");
        self.conditions.push(condition);
    }

    pub(crate) fn set_children(&mut self, on_true: NodeId, on_false: NodeId) {
        self.on_true = on_true;
        self.on_false = on_false;
    }

    /// Evaluate the disjunction of all conditions
    ///
    /// Every condition evaluates in stored order, even after one has already
    /// evaluated true: conditions may have observable side effects through
    /// their collaborators, and each is expected to run exactly once per
    /// branch evaluation. An empty condition list evaluates false.
    ///
    /// `node` is the label of the owning node, used to tag failures.
    ///
    /// # Errors
    ///
    /// Returns `ConditionEvaluation` for the first condition whose rule
    /// fails; later conditions are not evaluated.
    pub fn is_satisfied(&self, ctx: &ReviewContext, node: &str) -> Result<bool> {
        let mut satisfied = false;
        for condition in &self.conditions {
            let value = condition.evaluate(ctx).map_err(|source| {
                CheckwalkError::ConditionEvaluation {
                    condition_id: condition.id().to_string(),
                    node: node.to_string(),
                    source,
                }
            })?;
            tracing::debug!(
                node = node,
                condition_id = condition.id(),
                value = value,
                "evaluated condition"
            );
            if value {
                satisfied = true;
            }
        }
        Ok(satisfied)
    }

    /// Evaluate the disjunction and select the next child
    ///
    /// # Errors
    ///
    /// Forwards failures from [`Branch::is_satisfied`].
    pub fn decide(&self, ctx: &ReviewContext, node: &str) -> Result<NodeId> {
        if self.is_satisfied(ctx, node)? {
            Ok(self.on_true)
        } else {
            Ok(self.on_false)
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Branch(")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{}", condition.id())?;
        }
        write!(f, " -> {} | {})", self.on_true, self.on_false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RuleError, RuleResult};
    use crate::model::{AlwaysFalse, AlwaysTrue, ConditionRule, Subject};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ctx() -> ReviewContext {
        ReviewContext::new(Subject::new("doc:1", "doc"))
    }

    struct Counting {
        value: bool,
        hits: Arc<AtomicUsize>,
    }

    impl ConditionRule for Counting {
        fn test(&self, _ctx: &ReviewContext) -> RuleResult {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(self.value)
        }
    }

    struct Broken;

    impl ConditionRule for Broken {
        fn test(&self, _ctx: &ReviewContext) -> RuleResult {
            Err(RuleError::new("missing data"))
        }
    }

    fn counting(value: bool) -> (Condition, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let condition = Condition::new(
            format!("count-{}", value),
            Arc::new(Counting {
                value,
                hits: hits.clone(),
            }),
        );
        (condition, hits)
    }

    #[test]
    fn test_empty_disjunction_is_false() {
        let branch = Branch::new(NodeId::new(1), NodeId::new(2));
        assert!(!branch.is_satisfied(&ctx(), "root").unwrap());
        assert_eq!(branch.decide(&ctx(), "root").unwrap(), NodeId::new(2));
    }

    #[test]
    fn test_single_condition_selects_child() {
        let mut branch = Branch::new(NodeId::new(1), NodeId::new(2));
        branch.push_condition(Condition::new("t", Arc::new(AlwaysTrue)));
        assert_eq!(branch.decide(&ctx(), "root").unwrap(), NodeId::new(1));

        let mut branch = Branch::new(NodeId::new(1), NodeId::new(2));
        branch.push_condition(Condition::new("f", Arc::new(AlwaysFalse)));
        assert_eq!(branch.decide(&ctx(), "root").unwrap(), NodeId::new(2));
    }

    #[test]
    fn test_disjunction_does_not_short_circuit() {
        let (c1, h1) = counting(true);
        let (c2, h2) = counting(false);
        let (c3, h3) = counting(true);

        let mut branch = Branch::new(NodeId::new(1), NodeId::new(2));
        branch.push_condition(c1);
        branch.push_condition(c2);
        branch.push_condition(c3);

        assert!(branch.is_satisfied(&ctx(), "root").unwrap());

        // Every condition ran exactly once, even after the first true.
        assert_eq!(h1.load(Ordering::SeqCst), 1);
        assert_eq!(h2.load(Ordering::SeqCst), 1);
        assert_eq!(h3.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_stops_later_conditions() {
        let (c1, h1) = counting(true);
        let (c3, h3) = counting(true);

        let mut branch = Branch::new(NodeId::new(1), NodeId::new(2));
        branch.push_condition(c1);
        branch.push_condition(Condition::new("broken", Arc::new(Broken)));
        branch.push_condition(c3);

        let err = branch.is_satisfied(&ctx(), "root").unwrap_err();

        assert!(matches!(
            err,
            CheckwalkError::ConditionEvaluation { ref condition_id, ref node, .. }
                if condition_id == "broken" && node == "root"
        ));
        assert_eq!(h1.load(Ordering::SeqCst), 1);
        assert_eq!(h3.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_display_summarises_conditions_and_children() {
        let mut branch = Branch::new(NodeId::new(1), NodeId::new(2));
        branch.push_condition(Condition::new("a", Arc::new(AlwaysTrue)));
        branch.push_condition(Condition::new("b", Arc::new(AlwaysFalse)));

        assert_eq!(branch.to_string(), "Branch(a OR b -> node:1 | node:2)");
    }
}
