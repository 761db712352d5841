use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use checkwalk_core::{
    Condition, ConditionRule, Outcome, OutcomeStatus, ReviewContext, RuleError, RuleResult,
    Subject, Task, TaskError, TaskResult,
};

/// Create a review context for a throwaway test subject
#[allow(dead_code)]
pub fn new_context() -> ReviewContext {
    ReviewContext::new(Subject::new("doc:test", "Test document"))
}

/// Task that records a fixed outcome for its check id
#[allow(dead_code)]
pub struct RecordingTask {
    id: String,
    status: OutcomeStatus,
    runs: Arc<AtomicUsize>,
}

impl RecordingTask {
    #[allow(dead_code)]
    pub fn new(id: &str, status: OutcomeStatus) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            status,
            runs: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// How many times this task ran, across all walks
    #[allow(dead_code)]
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Task for RecordingTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, ctx: &mut ReviewContext) -> TaskResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ctx.record_outcome(Outcome::new(self.id.clone(), self.status));
        Ok(())
    }
}

/// Task that always fails with the given message
#[allow(dead_code)]
pub struct FailingTask {
    id: String,
    message: String,
}

impl FailingTask {
    #[allow(dead_code)]
    pub fn new(id: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            message: message.to_string(),
        })
    }
}

impl Task for FailingTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, _ctx: &mut ReviewContext) -> TaskResult {
        Err(TaskError::new(self.message.clone()))
    }
}

/// Rule that returns a fixed value and counts its evaluations
#[allow(dead_code)]
pub struct CountingRule {
    value: bool,
    hits: Arc<AtomicUsize>,
}

impl ConditionRule for CountingRule {
    fn test(&self, _ctx: &ReviewContext) -> RuleResult {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

/// Build a condition around a counting rule, returning the hit counter
#[allow(dead_code)]
pub fn counting_condition(id: &str, value: bool) -> (Condition, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let condition = Condition::new(
        id,
        Arc::new(CountingRule {
            value,
            hits: hits.clone(),
        }),
    );
    (condition, hits)
}

/// Rule that always fails to evaluate
#[allow(dead_code)]
pub struct FailingRule {
    message: String,
}

impl ConditionRule for FailingRule {
    fn test(&self, _ctx: &ReviewContext) -> RuleResult {
        Err(RuleError::new(self.message.clone()))
    }
}

/// Build a condition whose rule always fails
#[allow(dead_code)]
pub fn failing_condition(id: &str, message: &str) -> Condition {
    Condition::new(
        id,
        Arc::new(FailingRule {
            message: message.to_string(),
        }),
    )
}

/// Rule satisfied when the latest outcome for a check id has the given status
#[allow(dead_code)]
pub struct OutcomeStatusRule {
    check_id: String,
    status: OutcomeStatus,
}

impl ConditionRule for OutcomeStatusRule {
    fn test(&self, ctx: &ReviewContext) -> RuleResult {
        match ctx.outcome(&self.check_id) {
            Some(outcome) => Ok(outcome.status == self.status),
            None => Err(RuleError::new(format!(
                "no outcome recorded for check '{}'",
                self.check_id
            ))),
        }
    }
}

/// Build a condition over the recorded status of a check
#[allow(dead_code)]
pub fn status_condition(id: &str, check_id: &str, status: OutcomeStatus) -> Condition {
    Condition::new(
        id,
        Arc::new(OutcomeStatusRule {
            check_id: check_id.to_string(),
            status,
        }),
    )
}
