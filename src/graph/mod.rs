//! Conflict graph and group coloring.
//!
//! Examinees are nodes; weighted edges record why two examinees should
//! not be treated as interchangeable:
//!
//! | Edge | Weight | Meaning |
//! |------|--------|---------|
//! | Hard | 10 | Same exam date and time slot |
//! | Relationship | 5 | Reported relationship (additive) |
//! | Section | 2 | Same (batch, year, department), only where no edge exists |
//!
//! The colorer partitions nodes into color groups with no internal
//! hard conflict. Each group is handed to the room allocator as a unit.
//!
//! # References
//!
//! - Brélaz (1979), "New methods to color the vertices of a graph",
//!   Communications of the ACM 22(4)
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"

mod builder;
mod coloring;

pub use builder::{ConflictGraphBuilder, GraphOptions};
pub use coloring::{color_groups, dsatur, ColorGroup, Coloring, ColoringStats};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Weight of a same-session (hard) conflict edge.
pub const HARD_CONFLICT_WEIGHT: u32 = 10;
/// Weight added for a reported relationship.
pub const RELATIONSHIP_WEIGHT: u32 = 5;
/// Weight of a same-section soft edge.
pub const SECTION_WEIGHT: u32 = 2;

/// An undirected edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Accumulated weight.
    pub weight: u32,
    /// Whether the edge carries a hard (same-session) conflict.
    pub hard: bool,
}

/// Weighted undirected graph over examinee IDs.
///
/// Nodes are arena-indexed in insertion (roster) order; adjacency lists
/// are ordered maps so that every traversal is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<BTreeMap<usize, Edge>>,
    relationship_edges: usize,
}

impl ConflictGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning its index. Re-adding an ID returns the
    /// existing index.
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        self.adjacency.push(BTreeMap::new());
        idx
    }

    /// Adds `weight` to the edge between two nodes, creating it if needed.
    /// Self-loops are ignored.
    pub fn add_weight(&mut self, a: usize, b: usize, weight: u32, hard: bool) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            let edge = self.adjacency[from].entry(to).or_insert(Edge {
                weight: 0,
                hard: false,
            });
            edge.weight += weight;
            edge.hard |= hard;
        }
    }

    /// Adds or strengthens a hard conflict edge.
    pub fn add_hard_conflict(&mut self, a: usize, b: usize) {
        self.add_weight(a, b, HARD_CONFLICT_WEIGHT, true);
    }

    /// Adds or strengthens a relationship edge.
    pub fn add_relationship(&mut self, a: usize, b: usize) {
        if a != b {
            self.add_weight(a, b, RELATIONSHIP_WEIGHT, false);
            self.relationship_edges += 1;
        }
    }

    /// Whether an edge exists between two nodes.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|adj| adj.contains_key(&b))
    }

    /// Edge between two examinees, looked up by ID.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<Edge> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        self.adjacency[a].get(&b).copied()
    }

    /// Whether two examinees are in hard conflict.
    pub fn is_hard_conflict(&self, a: &str, b: &str) -> bool {
        self.edge_between(a, b).is_some_and(|e| e.hard)
    }

    /// Index of an examinee ID.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Examinee ID of a node.
    pub fn node_id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    /// All node IDs in index order.
    pub fn node_ids(&self) -> &[String] {
        &self.ids
    }

    /// Neighbours of a node with their edges, in index order.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, &Edge)> + '_ {
        self.adjacency[idx].iter().map(|(&n, e)| (n, e))
    }

    /// Number of neighbours.
    #[inline]
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Number of relationship pairs that produced an edge.
    pub fn relationship_edges(&self) -> usize {
        self.relationship_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_is_idempotent() {
        let mut g = ConflictGraph::new();
        let a = g.add_node("A");
        let b = g.add_node("B");
        assert_eq!(g.add_node("A"), a);
        assert_ne!(a, b);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_id(b), "B");
    }

    #[test]
    fn test_weights_accumulate() {
        let mut g = ConflictGraph::new();
        let a = g.add_node("A");
        let b = g.add_node("B");
        g.add_hard_conflict(a, b);
        g.add_relationship(a, b);

        let edge = g.edge_between("B", "A").unwrap();
        assert_eq!(edge.weight, HARD_CONFLICT_WEIGHT + RELATIONSHIP_WEIGHT);
        assert!(edge.hard);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.relationship_edges(), 1);
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut g = ConflictGraph::new();
        let a = g.add_node("A");
        g.add_hard_conflict(a, a);
        g.add_relationship(a, a);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree(a), 0);
        assert_eq!(g.relationship_edges(), 0);
    }

    #[test]
    fn test_hard_and_soft_edges() {
        let mut g = ConflictGraph::new();
        let a = g.add_node("A");
        let b = g.add_node("B");
        let c = g.add_node("C");
        g.add_hard_conflict(a, b);
        g.add_weight(b, c, SECTION_WEIGHT, false);

        assert!(g.is_hard_conflict("A", "B"));
        assert!(!g.is_hard_conflict("B", "C"));
        assert!(g.has_edge(c, b));
    }
}
