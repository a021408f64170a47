use std::collections::{HashMap, VecDeque};

use bnb_core::{NodeId, NodeLog};
use serde::Serialize;

/// Drawing coordinates of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Lay the search tree out level by level.
///
/// Levels come from a breadth-first walk starting at the root. Within a level
/// nodes keep their log order and are spread evenly over `[-0.5, 0.5]`; level
/// `k` sits at `y = -0.5 k`. Records not reachable from the root are skipped.
pub fn tree_positions(log: &NodeLog) -> Vec<Position> {
    let mut level_of: HashMap<NodeId, usize> = HashMap::new();
    let mut queue: VecDeque<(NodeId, usize)> = log
        .iter()
        .filter(|n| n.is_root())
        .map(|n| (n.id.clone(), 0))
        .collect();

    while let Some((id, level)) = queue.pop_front() {
        if level_of.contains_key(&id) {
            continue;
        }
        for child in log.children_of(&id) {
            queue.push_back((child.id.clone(), level + 1));
        }
        level_of.insert(id, level);
    }

    let mut levels: Vec<Vec<&NodeId>> = Vec::new();
    for node in log {
        if let Some(&level) = level_of.get(&node.id) {
            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(&node.id);
        }
    }

    let mut positions = Vec::with_capacity(level_of.len());
    for (level, ids) in levels.iter().enumerate() {
        let n = ids.len() as f64;
        for (i, id) in ids.iter().enumerate() {
            positions.push(Position {
                id: (*id).clone(),
                x: (i as f64 + 1.0) / (n + 1.0) - 0.5,
                y: -0.5 * level as f64,
            });
        }
    }
    positions
}
