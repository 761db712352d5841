//! Arena-backed check tree and its builder
//!
//! Nodes live in an arena and refer to each other by [`NodeId`] handles, so
//! two branches can share a child without ownership ambiguity and a built
//! tree can be shared read-only across concurrent walks.

use std::sync::Arc;

use crate::errors::{CheckwalkError, Result};
use crate::model::{Branch, Condition, Node, NodeId, Task};

/// Immutable decision tree of conformance-checking steps
///
/// Built once via [`TreeBuilder`], read-only for the lifetime of all walks.
/// Safe to share behind an `Arc` across concurrently executing walks.
#[derive(Debug)]
pub struct CheckTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CheckTree {
    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a handle to its node
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if the handle is out of range. Handles produced
    /// by the builder that built this tree always resolve.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.index())
            .ok_or(CheckwalkError::UnknownNode {
                node_id: id,
                size: self.nodes.len(),
            })
    }
}

/// Builder for [`CheckTree`]
///
/// All structural edits (adding tasks, setting branches and children,
/// attaching conditions) happen here, before `build`. The built tree admits
/// no further mutation.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a node with the given diagnostic label, returning its handle
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let label = label.into();
        tracing::debug!(node = label.as_str(), %id, "adding node");
        self.nodes.push(Node::new(label));
        id
    }

    /// Append a task to a node's sequence
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if the handle is foreign to this builder.
    pub fn add_task(&mut self, node: NodeId, task: Arc<dyn Task>) -> Result<()> {
        self.node_mut(node)?.push_task(task);
        Ok(())
    }

    /// Give a node a branch
    ///
    /// A `None` arm defaults to a fresh empty terminal node, so both
    /// children are always present and the walker never needs a null check.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if any provided handle is foreign to this
    /// builder.
    pub fn set_branch(
        &mut self,
        node: NodeId,
        on_true: Option<NodeId>,
        on_false: Option<NodeId>,
    ) -> Result<()> {
        self.check_handle(node)?;
        if let Some(child) = on_true {
            self.check_handle(child)?;
        }
        if let Some(child) = on_false {
            self.check_handle(child)?;
        }

        let on_true = match on_true {
            Some(child) => child,
            None => self.default_child(node, "true"),
        };
        let on_false = match on_false {
            Some(child) => child,
            None => self.default_child(node, "false"),
        };

        self.node_mut(node)?.set_branch(Branch::new(on_true, on_false));
        Ok(())
    }

    /// Append a condition to a node's branch
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` for a foreign handle, or `BranchMissing` if
    /// `set_branch` has not been called for the node yet.
    pub fn add_condition(&mut self, node: NodeId, condition: Condition) -> Result<()> {
        let entry = self.node_mut(node)?;
        let label = entry.label().to_string();
        match entry.branch_mut() {
            Some(branch) => {
                branch.push_condition(condition);
                Ok(())
            }
            None => Err(CheckwalkError::BranchMissing { node: label }),
        }
    }

    /// Replace both children of a node's branch
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` for a foreign handle, or `BranchMissing` if the
    /// node has no branch.
    pub fn set_children(&mut self, node: NodeId, on_true: NodeId, on_false: NodeId) -> Result<()> {
        self.check_handle(on_true)?;
        self.check_handle(on_false)?;
        let entry = self.node_mut(node)?;
        let label = entry.label().to_string();
        match entry.branch_mut() {
            Some(branch) => {
                branch.set_children(on_true, on_false);
                Ok(())
            }
            None => Err(CheckwalkError::BranchMissing { node: label }),
        }
    }

    /// Validate the structure and produce the immutable tree
    ///
    /// # Errors
    ///
    /// * `EmptyTree` - no nodes were added
    /// * `UnknownNode` - the root or a branch child handle is out of range
    pub fn build(self, root: NodeId) -> Result<CheckTree> {
        if self.nodes.is_empty() {
            return Err(CheckwalkError::EmptyTree);
        }

        let size = self.nodes.len();
        let check = |id: NodeId| -> Result<()> {
            if id.index() < size {
                Ok(())
            } else {
                Err(CheckwalkError::UnknownNode { node_id: id, size })
            }
        };

        check(root)?;
        for node in &self.nodes {
            if let Some(branch) = node.branch() {
                check(branch.on_true())?;
                check(branch.on_false())?;
            }
        }

        Ok(CheckTree {
            nodes: self.nodes,
            root,
        })
    }

    fn default_child(&mut self, parent: NodeId, arm: &str) -> NodeId {
        // Label mirrors the parent so a walk that ends here is traceable.
        let label = match self.nodes.get(parent.index()) {
            Some(node) => format!("{}/{}-leaf", node.label(), arm),
            None => format!("{}-leaf", arm),
        };
        self.add_node(label)
    }

    fn check_handle(&self, id: NodeId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(CheckwalkError::UnknownNode {
                node_id: id,
                size: self.nodes.len(),
            })
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let size = self.nodes.len();
        self.nodes
            .get_mut(id.index())
            .ok_or(CheckwalkError::UnknownNode { node_id: id, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlwaysTrue, Condition};

    #[test]
    fn test_build_empty_tree_fails() {
        let builder = TreeBuilder::new();
        let result = builder.build(NodeId::new(0));
        assert_eq!(result.unwrap_err(), CheckwalkError::EmptyTree);
    }

    #[test]
    fn test_handles_resolve_on_built_tree() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_node("root");
        let tree = builder.build(root).unwrap();

        assert_eq!(tree.root(), root);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(root).unwrap().label(), "root");
    }

    #[test]
    fn test_foreign_handle_rejected_by_ops() {
        let mut builder = TreeBuilder::new();
        builder.add_node("root");
        let foreign = NodeId::new(42);

        let err = builder
            .set_branch(foreign, None, None)
            .unwrap_err();
        assert!(matches!(err, CheckwalkError::UnknownNode { .. }));
    }

    #[test]
    fn test_foreign_root_rejected_at_build() {
        let mut builder = TreeBuilder::new();
        builder.add_node("root");

        let err = builder.build(NodeId::new(9)).unwrap_err();
        assert!(matches!(err, CheckwalkError::UnknownNode { node_id, .. } if node_id.index() == 9));
    }

    #[test]
    fn test_default_arms_become_empty_terminal_nodes() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_node("root");
        builder.set_branch(root, None, None).unwrap();

        let tree = builder.build(root).unwrap();
        assert_eq!(tree.len(), 3);

        let branch = tree.node(root).unwrap().branch().unwrap();
        let on_true = tree.node(branch.on_true()).unwrap();
        let on_false = tree.node(branch.on_false()).unwrap();

        assert!(on_true.is_terminal());
        assert!(on_true.tasks().is_empty());
        assert_eq!(on_true.label(), "root/true-leaf");
        assert!(on_false.is_terminal());
        assert_eq!(on_false.label(), "root/false-leaf");
    }

    #[test]
    fn test_add_condition_requires_branch() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_node("root");

        let err = builder
            .add_condition(root, Condition::new("c1", Arc::new(AlwaysTrue)))
            .unwrap_err();
        assert_eq!(
            err,
            CheckwalkError::BranchMissing {
                node: "root".to_string()
            }
        );
    }

    #[test]
    fn test_children_can_be_shared() {
        let mut builder = TreeBuilder::new();
        let shared_leaf = builder.add_node("shared-leaf");
        let left = builder.add_node("left");
        let right = builder.add_node("right");
        let root = builder.add_node("root");

        // Both inner branches point at the same terminal node.
        builder
            .set_branch(left, Some(shared_leaf), Some(shared_leaf))
            .unwrap();
        builder
            .set_branch(right, Some(shared_leaf), Some(shared_leaf))
            .unwrap();
        builder.set_branch(root, Some(left), Some(right)).unwrap();

        let tree = builder.build(root).unwrap();
        let left_branch = tree.node(left).unwrap().branch().unwrap();
        let right_branch = tree.node(right).unwrap().branch().unwrap();
        assert_eq!(left_branch.on_true(), right_branch.on_true());
    }

    #[test]
    fn test_set_children_replaces_default_arms() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_node("root");
        builder.set_branch(root, None, None).unwrap();

        let a = builder.add_node("a");
        let b = builder.add_node("b");
        builder.set_children(root, a, b).unwrap();

        let tree = builder.build(root).unwrap();
        let branch = tree.node(root).unwrap().branch().unwrap();
        assert_eq!(branch.on_true(), a);
        assert_eq!(branch.on_false(), b);
    }

    #[test]
    fn test_set_children_requires_branch() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_node("root");
        let a = builder.add_node("a");
        let b = builder.add_node("b");

        let err = builder.set_children(root, a, b).unwrap_err();
        assert!(matches!(err, CheckwalkError::BranchMissing { .. }));
    }
}
