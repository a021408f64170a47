//! Search node records and node ids.

use std::fmt;

use crate::model::BranchConstraint;

/// Identifier of a search node.
///
/// The root is 1 and the children of `k` are `2k+1` (`<=` branch) and `2k+2`
/// (`>=` branch). Ids are stored as the binary digits of `id + 1`, which is a
/// leading one followed by the down/up choices on the path from the root
/// (0 for down, 1 for up), so they never overflow however deep the search goes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// `id + 1` as little-endian 64-bit limbs, highest limb non-zero.
    key: Vec<u64>,
}

const DECIMAL_CHUNK: u128 = 10_000_000_000_000_000_000;

impl NodeId {
    /// Id 1.
    pub fn root() -> Self {
        Self { key: vec![2] }
    }

    fn child(&self, bit: u64) -> Self {
        let mut key = Vec::with_capacity(self.key.len() + 1);
        let mut carry = bit;
        for &limb in &self.key {
            key.push((limb << 1) | carry);
            carry = limb >> 63;
        }
        if carry != 0 {
            key.push(carry);
        }
        Self { key }
    }

    /// Id `2k+1` of the `<=` child.
    pub fn down_child(&self) -> Self {
        self.child(0)
    }

    /// Id `2k+2` of the `>=` child.
    pub fn up_child(&self) -> Self {
        self.child(1)
    }

    /// `(down_child, up_child)`.
    pub fn children(&self) -> (Self, Self) {
        (self.down_child(), self.up_child())
    }

    /// Limbs of `id` itself (`key - 1`), highest limb non-zero.
    fn id_limbs(&self) -> Vec<u64> {
        let mut limbs = self.key.clone();
        for limb in limbs.iter_mut() {
            let (v, borrow) = limb.overflowing_sub(1);
            *limb = v;
            if !borrow {
                break;
            }
        }
        while limbs.last() == Some(&0) {
            limbs.pop();
        }
        limbs
    }

    /// The id as an integer, if it fits in 128 bits.
    pub fn as_u128(&self) -> Option<u128> {
        let limbs = self.id_limbs();
        match limbs.as_slice() {
            [] => Some(0),
            [lo] => Some(u128::from(*lo)),
            [lo, hi] => Some(u128::from(*lo) | (u128::from(*hi) << 64)),
            _ => None,
        }
    }

    /// The id as an integer, if it fits in 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_u128().and_then(|v| u64::try_from(v).ok())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.as_u128() {
            return write!(f, "{}", v);
        }

        // Repeated division by 10^19, least significant chunk first
        let mut limbs = self.id_limbs();
        let mut chunks = Vec::new();
        while !limbs.is_empty() {
            let mut rem: u128 = 0;
            for limb in limbs.iter_mut().rev() {
                let cur = (rem << 64) | u128::from(*limb);
                *limb = (cur / DECIMAL_CHUNK) as u64;
                rem = cur % DECIMAL_CHUNK;
            }
            while limbs.last() == Some(&0) {
                limbs.pop();
            }
            chunks.push(rem as u64);
        }

        let mut iter = chunks.iter().rev();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for chunk in iter {
            write!(f, "{:019}", chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

/// Serialized as a JSON number when it fits in `u64`, else as a decimal string.
#[cfg(feature = "serde")]
impl serde::Serialize for NodeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_u64() {
            Some(v) => serializer.serialize_u64(v),
            None => serializer.collect_str(self),
        }
    }
}

/// Outcome of visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeClass {
    /// Visited, not yet classified.
    Open,

    /// Cut off: infeasible, or its bound cannot beat the incumbent.
    Pruned,

    /// Relaxed solution is integral; no branching needed.
    PrunedInteger,

    /// Split into two children.
    Branched,
}

/// One visited node of the search tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeRecord {
    /// Unique node identifier.
    pub id: NodeId,

    /// Parent node ID (None for root).
    pub parent_id: Option<NodeId>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Branching constraint that created this node (None for root).
    pub branch: Option<BranchConstraint>,

    /// Relaxation value, or the sense's worst value if infeasible.
    pub bound: f64,

    /// Relaxed solution (None if infeasible).
    pub relaxed_solution: Option<Vec<f64>>,

    /// Node classification.
    pub class: NodeClass,

    /// The node's solution replaced the incumbent.
    pub is_new_incumbent: bool,

    /// Oracle failure that was turned into infeasibility.
    pub failure: Option<String>,
}

impl NodeRecord {
    /// Create an open record.
    pub fn new(
        id: NodeId,
        parent_id: Option<NodeId>,
        depth: usize,
        branch: Option<BranchConstraint>,
        bound: f64,
        relaxed_solution: Option<Vec<f64>>,
    ) -> Self {
        Self {
            id,
            parent_id,
            depth,
            branch,
            bound,
            relaxed_solution,
            class: NodeClass::Open,
            is_new_incumbent: false,
            failure: None,
        }
    }

    /// True if the relaxation had no solution (or the oracle failed).
    pub fn is_infeasible(&self) -> bool {
        self.relaxed_solution.is_none()
    }

    /// True if the node is the root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Id `n` built from the root by following the numbering.
    fn id(n: u64) -> NodeId {
        if n == 1 {
            NodeId::root()
        } else if n % 2 == 1 {
            id((n - 1) / 2).down_child()
        } else {
            id((n - 2) / 2).up_child()
        }
    }

    #[test]
    fn test_child_numbering() {
        assert_eq!(NodeId::root().as_u64(), Some(1));
        let (down, up) = NodeId::root().children();
        assert_eq!((down.as_u64(), up.as_u64()), (Some(3), Some(4)));
        assert_eq!(id(3).up_child().as_u64(), Some(8));
        assert_eq!(id(4).down_child().as_u64(), Some(9));
        assert_eq!(id(183).as_u64(), Some(183));
        assert_eq!(id(183).to_string(), "183");
    }

    #[test]
    fn test_deep_ids_do_not_overflow() {
        let mut node = NodeId::root();
        for _ in 0..63 {
            node = node.down_child();
        }
        // id + 1 = 2^64
        assert_eq!(node.as_u64(), Some(u64::MAX));

        node = node.down_child();
        assert_eq!(node.as_u64(), None);
        assert_eq!(node.as_u128(), Some((1u128 << 65) - 1));
        assert_eq!(node.to_string(), "36893488147419103231");

        let mut deep = NodeId::root();
        for _ in 0..200 {
            deep = deep.up_child();
        }
        assert_eq!(deep.as_u128(), None);
        // All-up path of length d: id = 3 * 2^d - 2
        assert_eq!(
            deep.to_string(),
            "4820814132776970826625886277023487807566608981348378505904126"
        );
        assert_ne!(deep, deep.down_child());
        assert_ne!(deep.down_child(), deep.up_child());
    }

    #[test]
    fn test_display_across_chunks() {
        // id = 2^128 (key = 2^128 + 1 needs three limbs)
        let node = NodeId {
            key: vec![1, 0, 1],
        };
        assert_eq!(node.as_u128(), None);
        assert_eq!(node.to_string(), "340282366920938463463374607431768211456");
    }

    #[test]
    fn test_new_record_is_open() {
        let node = NodeRecord::new(NodeId::root(), None, 0, None, 3.5, Some(vec![0.5]));
        assert_eq!(node.class, NodeClass::Open);
        assert!(node.is_root());
        assert!(!node.is_infeasible());
        assert!(!node.is_new_incumbent);
        assert!(node.failure.is_none());

        let child = NodeRecord::new(
            id(3),
            Some(NodeId::root()),
            1,
            Some(BranchConstraint::le(0, 0.0)),
            f64::NEG_INFINITY,
            None,
        );
        assert!(!child.is_root());
        assert!(child.is_infeasible());
    }
}
