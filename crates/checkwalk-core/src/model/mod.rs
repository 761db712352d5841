pub mod branch;
pub mod condition;
pub mod context;
pub mod node;
pub mod task;

pub use branch::Branch;
pub use condition::{AlwaysFalse, AlwaysTrue, Condition, ConditionRule};
pub use context::{Outcome, OutcomeStatus, ReviewContext, Subject};
pub use node::{Node, NodeId};
pub use task::Task;
