//! Objective direction and the tolerance-guarded comparisons built on it.

use bnb_lp::Sense;

/// Optimization direction of a problem instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveSense {
    /// Smaller objective values are better.
    Minimize,

    /// Larger objective values are better.
    Maximize,
}

impl ObjectiveSense {
    /// The worst possible value: the incumbent's initial value and the bound
    /// recorded for infeasible nodes.
    pub fn worst(self) -> f64 {
        match self {
            ObjectiveSense::Minimize => f64::INFINITY,
            ObjectiveSense::Maximize => f64::NEG_INFINITY,
        }
    }

    /// True if `candidate` beats `reference` by more than `tol`.
    pub fn improves(self, candidate: f64, reference: f64, tol: f64) -> bool {
        match self {
            ObjectiveSense::Minimize => candidate < reference - tol,
            ObjectiveSense::Maximize => candidate > reference + tol,
        }
    }

    /// True if a node with relaxation bound `bound` cannot beat `incumbent`.
    pub fn can_prune(self, bound: f64, incumbent: f64, tol: f64) -> bool {
        !self.improves(bound, incumbent, tol)
    }
}

impl From<ObjectiveSense> for Sense {
    fn from(sense: ObjectiveSense) -> Self {
        match sense {
            ObjectiveSense::Minimize => Sense::Minimize,
            ObjectiveSense::Maximize => Sense::Maximize,
        }
    }
}

impl From<Sense> for ObjectiveSense {
    fn from(sense: Sense) -> Self {
        match sense {
            Sense::Minimize => ObjectiveSense::Minimize,
            Sense::Maximize => ObjectiveSense::Maximize,
        }
    }
}
