//! Undirected adjacency derived from the catalog's declared connections.
//!
//! Catalog authors may declare an edge on either endpoint (or both). The
//! index inserts every declared edge in both directions, so reachability is
//! symmetric no matter how the data was written. Building is a pure function
//! of the catalog: sessions rebuild it on reset and import instead of
//! patching a previous index.

use std::collections::{BTreeSet, VecDeque};

use crate::active::ActiveSet;
use crate::catalog::Catalog;
use crate::id::NodeIdx;

/// Neighbor sets indexed by [`NodeIdx`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    neighbors: Vec<BTreeSet<NodeIdx>>,
}

impl AdjacencyIndex {
    /// Build the symmetric neighbor map for `catalog`.
    pub fn build(catalog: &Catalog) -> Self {
        let mut neighbors = vec![BTreeSet::new(); catalog.len()];

        for (idx, node) in catalog.iter() {
            for target in &node.connections {
                let Some(other) = catalog.index_of(target) else {
                    continue;
                };
                if other == idx {
                    continue;
                }
                neighbors[idx.index()].insert(other);
                neighbors[other.index()].insert(idx);
            }
        }

        Self { neighbors }
    }

    /// Neighbors of `idx` in catalog order. Empty for unknown indices.
    pub fn neighbors(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.neighbors
            .get(idx.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn are_adjacent(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.neighbors
            .get(a.index())
            .is_some_and(|set| set.contains(&b))
    }

    pub fn degree(&self, idx: NodeIdx) -> usize {
        self.neighbors.get(idx.index()).map_or(0, BTreeSet::len)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Number of nodes the index covers.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Whether any neighbor of `idx` is in `set`.
    pub fn touches(&self, idx: NodeIdx, set: &ActiveSet) -> bool {
        self.neighbors(idx).any(|n| set.contains(n))
    }

    /// Breadth-first search from `start` that only walks edges whose both
    /// endpoints are members of `members`. Returns the members reached.
    ///
    /// If `start` itself is not a member the result is empty.
    pub fn connected_within(&self, start: NodeIdx, members: &ActiveSet) -> ActiveSet {
        let mut reached = ActiveSet::new();
        if !members.contains(start) || start.index() >= self.neighbors.len() {
            return reached;
        }

        let mut queue = VecDeque::new();
        reached.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if members.contains(next) && reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        reached
    }
}
