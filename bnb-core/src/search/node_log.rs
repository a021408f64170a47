//! Append-only log of visited nodes.

use super::node::{NodeId, NodeRecord};

/// Every node visited by one run, in visiting (depth-first) order.
///
/// Records are only appended by the search; the tree can be rebuilt from
/// `id` and `parent_id`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct NodeLog {
    records: Vec<NodeRecord>,
}

impl NodeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: NodeRecord) {
        self.records.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no node was visited.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in visiting order.
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Iterate in visiting order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeRecord> {
        self.records.iter()
    }

    /// Look up a node by id.
    pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// Children of `id` in visiting order.
    pub fn children_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a NodeRecord> {
        self.records
            .iter()
            .filter(move |r| r.parent_id.as_ref() == Some(id))
    }

    /// `(node id, value)` for every incumbent update, in order.
    pub fn incumbent_trace(&self) -> Vec<(NodeId, f64)> {
        self.records
            .iter()
            .filter(|r| r.is_new_incumbent)
            .map(|r| (r.id.clone(), r.bound))
            .collect()
    }
}

impl FromIterator<NodeRecord> for NodeLog {
    fn from_iter<I: IntoIterator<Item = NodeRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodeLog {
    type Item = &'a NodeRecord;
    type IntoIter = std::slice::Iter<'a, NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
