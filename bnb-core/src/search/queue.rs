//! Pending-node stack for the non-recursive search driver.

use super::node::NodeId;
use crate::model::ConstraintSet;

/// A node waiting to be visited.
#[derive(Debug, Clone)]
pub struct PendingNode {
    /// Constraints on the path from the root.
    pub constraints: ConstraintSet,

    /// Parent node ID (None for root).
    pub parent_id: Option<NodeId>,

    /// Node identifier.
    pub id: NodeId,
}

/// LIFO stack of pending nodes.
///
/// Pushing the `>=` child before the `<=` child makes pops follow the same
/// order as the recursive search.
#[derive(Debug, Default)]
pub struct NodeStack {
    stack: Vec<PendingNode>,

    /// Count of nodes pushed.
    nodes_added: u64,

    /// Largest stack size seen.
    peak: usize,
}

impl NodeStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    pub fn push(&mut self, node: PendingNode) {
        self.stack.push(node);
        self.nodes_added += 1;
        self.peak = self.peak.max(self.stack.len());
    }

    /// Take the most recently pushed node.
    pub fn pop(&mut self) -> Option<PendingNode> {
        self.stack.pop()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of pending nodes.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Get the total number of nodes pushed.
    pub fn total_added(&self) -> u64 {
        self.nodes_added
    }

    /// Largest number of pending nodes held at once.
    pub fn peak(&self) -> usize {
        self.peak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BranchConstraint;

    fn pending(id: NodeId) -> PendingNode {
        PendingNode {
            constraints: ConstraintSet::new().with(BranchConstraint::le(0, 0.0)),
            parent_id: Some(NodeId::root()),
            id,
        }
    }

    #[test]
    fn test_lifo_order() {
        let (down, up) = NodeId::root().children();
        let mut stack = NodeStack::new();
        stack.push(pending(up.clone()));
        stack.push(pending(down.clone()));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|n| n.id), Some(down));
        assert_eq!(stack.pop().map(|n| n.id), Some(up));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_counters() {
        let (down, up) = NodeId::root().children();
        let mut stack = NodeStack::new();
        stack.push(pending(up));
        stack.push(pending(down.clone()));
        stack.pop();
        stack.push(pending(down.up_child()));

        assert_eq!(stack.total_added(), 3);
        assert_eq!(stack.peak(), 2);
    }
}
