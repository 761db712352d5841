//! Walk API Demonstration
//!
//! This example wires a small conformance-review tree by hand and walks it.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Building an immutable tree through TreeBuilder
//! 2. Task and condition-rule collaborators
//! 3. Branch decisions driven by accumulated outcomes
//! 4. Reading the walk report and the mutated context

use std::sync::Arc;

use checkwalk_core::{
    walk, Condition, ConditionRule, Outcome, OutcomeStatus, ReviewContext, RuleResult, Subject,
    Task, TaskResult, TreeBuilder,
};

/// Pretend check: records a fixed status for its check id.
struct StubCheck {
    id: &'static str,
    status: OutcomeStatus,
}

impl Task for StubCheck {
    fn id(&self) -> &str {
        self.id
    }

    fn run(&self, ctx: &mut ReviewContext) -> TaskResult {
        println!("  running check '{}'", self.id);
        ctx.record_outcome(
            Outcome::new(self.id, self.status).with_message(format!("{:?} (stubbed)", self.status)),
        );
        Ok(())
    }
}

/// True when the named check recorded a failing outcome.
struct CheckFailed(&'static str);

impl ConditionRule for CheckFailed {
    fn test(&self, ctx: &ReviewContext) -> RuleResult {
        Ok(ctx
            .outcome(self.0)
            .map(|o| o.status == OutcomeStatus::Failed)
            .unwrap_or(false))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkwalk Walk Demo ===\n");

    // ===== Part 1: Assemble the tree =====
    println!("## Part 1: Tree assembly\n");

    let mut builder = TreeBuilder::new();

    let report_errors = builder.add_node("report-errors");
    builder.add_task(
        report_errors,
        Arc::new(StubCheck {
            id: "collect-details",
            status: OutcomeStatus::Warning,
        }),
    )?;

    let deep_checks = builder.add_node("deep-checks");
    builder.add_task(
        deep_checks,
        Arc::new(StubCheck {
            id: "accessibility",
            status: OutcomeStatus::Passed,
        }),
    )?;

    let root = builder.add_node("root");
    builder.add_task(
        root,
        Arc::new(StubCheck {
            id: "markup",
            status: OutcomeStatus::Failed,
        }),
    )?;
    builder.add_task(
        root,
        Arc::new(StubCheck {
            id: "css",
            status: OutcomeStatus::Passed,
        }),
    )?;

    // Any failing basic check routes to the error-report leaf; otherwise the
    // walk continues into the deeper checks.
    builder.set_branch(root, Some(report_errors), Some(deep_checks))?;
    builder.add_condition(root, Condition::new("markup-failed", Arc::new(CheckFailed("markup"))))?;
    builder.add_condition(root, Condition::new("css-failed", Arc::new(CheckFailed("css"))))?;

    let tree = builder.build(root)?;
    println!("Built tree with {} nodes\n", tree.len());

    // ===== Part 2: Walk it =====
    println!("## Part 2: Walking\n");

    let mut ctx = ReviewContext::new(Subject::new(
        "https://example.com/",
        "Example landing page",
    ));

    let report = walk(&tree, &mut ctx)?;
    let terminal = tree.node(report.terminal)?;

    println!("\n✓ Walk finished at '{}' in {} steps", terminal.label(), report.steps);

    // ===== Part 3: Read the outcome =====
    println!("\n## Part 3: Outcomes\n");

    for outcome in ctx.outcomes() {
        println!(
            "  {:<16} {:?} {}",
            outcome.check_id,
            outcome.status,
            outcome.message.as_deref().unwrap_or("")
        );
    }
    println!(
        "\nReview {} of {} has failures: {}",
        ctx.review_id(),
        ctx.subject().id,
        ctx.has_failure()
    );

    Ok(())
}
