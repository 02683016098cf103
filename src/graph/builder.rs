//! Conflict graph construction.
//!
//! # Algorithm
//!
//! 1. Add every examinee as a node (isolated nodes are kept).
//! 2. Group examinees by (date, slot); connect every pair in a group with
//!    a hard edge.
//! 3. For each relationship pair whose ends are both on the roster, add
//!    the relationship weight (on top of any hard edge).
//! 4. Optionally group by (batch, year, department) and add a section
//!    edge between members not yet connected.
//!
//! # Complexity
//! O(n + Σ g²) where g ranges over group sizes; O(n²) in the worst case.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{ConflictGraph, SECTION_WEIGHT};
use crate::models::{Examinee, RelationshipPair};

/// Which soft edges the builder adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Add relationship edges and keep related examinees apart when seating.
    pub relationship_separation: bool,
    /// Add soft edges between examinees of the same section.
    pub section_separation: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            relationship_separation: true,
            section_separation: true,
        }
    }
}

impl GraphOptions {
    /// Hard conflicts only.
    pub fn hard_only() -> Self {
        Self {
            relationship_separation: false,
            section_separation: false,
        }
    }
}

/// Builds a [`ConflictGraph`] from a roster.
///
/// # Example
/// ```
/// use u_seating::graph::ConflictGraphBuilder;
/// use u_seating::models::{Examinee, ExamSlot};
///
/// let roster = vec![
///     Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning),
///     Examinee::new("S2", "Physics", "2024-05-01", ExamSlot::Morning),
/// ];
/// let graph = ConflictGraphBuilder::new(&roster).build();
/// assert!(graph.is_hard_conflict("S1", "S2"));
/// ```
#[derive(Debug, Clone)]
pub struct ConflictGraphBuilder<'a> {
    examinees: &'a [Examinee],
    relationships: &'a [RelationshipPair],
    options: GraphOptions,
}

impl<'a> ConflictGraphBuilder<'a> {
    /// Creates a builder with default options and no relationships.
    pub fn new(examinees: &'a [Examinee]) -> Self {
        Self {
            examinees,
            relationships: &[],
            options: GraphOptions::default(),
        }
    }

    /// Sets the relationship pairs.
    pub fn with_relationships(mut self, relationships: &'a [RelationshipPair]) -> Self {
        self.relationships = relationships;
        self
    }

    /// Sets the builder options.
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the graph.
    pub fn build(&self) -> ConflictGraph {
        let mut graph = ConflictGraph::new();
        let nodes: Vec<usize> = self
            .examinees
            .iter()
            .map(|e| graph.add_node(&e.id))
            .collect();

        self.add_session_conflicts(&mut graph, &nodes);

        if self.options.relationship_separation {
            self.add_relationships(&mut graph);
        }

        if self.options.section_separation {
            self.add_section_edges(&mut graph, &nodes);
        }

        graph
    }

    fn add_session_conflicts(&self, graph: &mut ConflictGraph, nodes: &[usize]) {
        let mut sessions: BTreeMap<_, Vec<usize>> = BTreeMap::new();
        for (e, &node) in self.examinees.iter().zip(nodes) {
            sessions
                .entry((e.exam_date.as_str(), &e.exam_slot))
                .or_default()
                .push(node);
        }

        for members in sessions.values() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    graph.add_hard_conflict(a, b);
                }
            }
        }
    }

    fn add_relationships(&self, graph: &mut ConflictGraph) {
        // Duplicate reports of the same pair count once.
        let pairs: BTreeSet<(&str, &str)> = self.relationships.iter().map(|p| p.key()).collect();

        for (a, b) in pairs {
            if let (Some(a), Some(b)) = (graph.node_index(a), graph.node_index(b)) {
                graph.add_relationship(a, b);
            }
        }
    }

    fn add_section_edges(&self, graph: &mut ConflictGraph, nodes: &[usize]) {
        let mut sections: BTreeMap<(&str, u8, &str), Vec<usize>> = BTreeMap::new();
        for (e, &node) in self.examinees.iter().zip(nodes) {
            sections.entry(e.section_key()).or_default().push(node);
        }

        for members in sections.values() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    if !graph.has_edge(a, b) {
                        graph.add_weight(a, b, SECTION_WEIGHT, false);
                    }
                }
            }
        }
    }
}
