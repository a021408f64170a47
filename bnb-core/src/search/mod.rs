//! Depth-first search tree: node records, branching and the search driver.

mod branching;
mod node;
mod node_log;
mod queue;
mod tree;

pub use branching::{fractionality, BranchDecision, BranchingSelector};
pub use node_log::NodeLog;
pub use node::{NodeClass, NodeId, NodeRecord};
pub use queue::{NodeStack, PendingNode};
pub use tree::{BranchAndBound, SearchStats};
