//! Tree walker: drives one pass from the root to a terminal node
//!
//! The walker is a small state machine. From `AtNode(n)` it executes `n`'s
//! tasks, then either finishes (no branch), fails (task or condition
//! failure), or follows the branch decision to the next node. `Finished`
//! and `Failed` are terminal: no further transitions occur.

use std::time::Instant;

use crate::errors::{CheckwalkError, Result};
use crate::model::{NodeId, ReviewContext};
use crate::tree::CheckTree;
use crate::{log_op_end, log_op_error, log_op_start};

/// Walker state
#[derive(Debug, Clone, PartialEq)]
pub enum WalkState {
    /// The walk will execute this node on the next step
    AtNode(NodeId),
    /// The walk reached a terminal node
    Finished(NodeId),
    /// The walk aborted; the context retains partial mutations
    Failed(CheckwalkError),
}

impl WalkState {
    /// Whether the walk admits further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WalkState::AtNode(_))
    }
}

/// Summary of a completed walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkReport {
    /// The terminal node the walk finished at
    pub terminal: NodeId,
    /// Number of nodes executed
    pub steps: usize,
}

/// Drives a single pass over a shared read-only tree for one context
///
/// [`Walker::step`] advances one node at a time, letting a surrounding
/// caller interleave its own deadline or cancellation checks between steps;
/// [`Walker::run`] drives to a terminal state. The walker never retries: on
/// failure the caller decides whether to start a fresh walk from the root.
pub struct Walker<'t> {
    tree: &'t CheckTree,
    state: WalkState,
    steps: usize,
    step_limit: Option<usize>,
}

impl<'t> Walker<'t> {
    /// Create a walker positioned at the tree root
    pub fn new(tree: &'t CheckTree) -> Self {
        Self {
            tree,
            state: WalkState::AtNode(tree.root()),
            steps: 0,
            step_limit: None,
        }
    }

    /// Guard against cyclic configurations by bounding executed nodes
    ///
    /// The tree is expected to be acyclic; the walker detects no cycles on
    /// its own. With a limit set, a walk that executes more than `limit`
    /// nodes fails with `StepLimitExceeded` instead of never finishing.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Current state
    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Number of nodes executed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Execute the current node and transition once
    ///
    /// In a terminal state this is a no-op returning the state unchanged.
    pub fn step(&mut self, ctx: &mut ReviewContext) -> &WalkState {
        let current = match self.state {
            WalkState::AtNode(id) => id,
            _ => return &self.state,
        };

        self.state = match self.advance(current, ctx) {
            Ok(state) => state,
            Err(err) => WalkState::Failed(err),
        };
        &self.state
    }

    /// Drive the walk to a terminal state
    ///
    /// # Errors
    ///
    /// Returns the failure that aborted the walk. The context retains every
    /// mutation applied before the failure.
    pub fn run(&mut self, ctx: &mut ReviewContext) -> Result<WalkReport> {
        let started = Instant::now();
        log_op_start!(
            "walk",
            review_id = ctx.review_id(),
            request_id = ctx.request().request_id.as_str(),
        );

        while !self.state.is_terminal() {
            self.step(ctx);
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        match &self.state {
            WalkState::Finished(terminal) => {
                let report = WalkReport {
                    terminal: *terminal,
                    steps: self.steps,
                };
                log_op_end!(
                    "walk",
                    duration_ms = duration_ms,
                    review_id = ctx.review_id(),
                    steps = self.steps as u64,
                );
                Ok(report)
            }
            WalkState::Failed(err) => {
                log_op_error!(
                    "walk",
                    err,
                    duration_ms = duration_ms,
                    review_id = ctx.review_id(),
                    steps = self.steps as u64,
                );
                Err(err.clone())
            }
            WalkState::AtNode(_) => unreachable!("loop exits only on terminal state"),
        }
    }

    fn advance(&mut self, current: NodeId, ctx: &mut ReviewContext) -> Result<WalkState> {
        let node = self.tree.node(current)?;

        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(CheckwalkError::StepLimitExceeded {
                    node: node.label().to_string(),
                    limit,
                });
            }
        }
        self.steps += 1;

        let has_branch = node.execute(ctx)?;
        if !has_branch {
            return Ok(WalkState::Finished(current));
        }

        // execute() returned true, so the branch is present.
        let branch = node
            .branch()
            .expect("execute reported a branch on this node");
        let next = branch.decide(ctx, node.label())?;
        Ok(WalkState::AtNode(next))
    }
}

/// Walk the tree from its root to a terminal node
///
/// Convenience over [`Walker::run`] for callers that need no step limit and
/// no step-wise control.
///
/// # Errors
///
/// Forwards the failure that aborted the walk.
pub fn walk(tree: &CheckTree, ctx: &mut ReviewContext) -> Result<WalkReport> {
    Walker::new(tree).run(ctx)
}
