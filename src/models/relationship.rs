//! Relationship model.
//!
//! Relationships are reported externally (friends, relatives, hostel
//! mates). The engine never infers them; it only uses them to add
//! medium-weight conflict edges and to keep related examinees off
//! neighbouring seats.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// An unordered pair of related examinees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipPair {
    /// Lexicographically smaller examinee ID.
    pub first: String,
    /// Lexicographically larger examinee ID.
    pub second: String,
    /// Relationship category.
    #[serde(default)]
    pub kind: RelationshipKind,
}

/// Relationship category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    #[default]
    Friend,
    Relative,
    SameHostel,
    SameRoom,
}

impl RelationshipPair {
    /// Creates a friend pair. IDs are stored in sorted order so that
    /// `(a, b)` and `(b, a)` compare equal.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            kind: RelationshipKind::Friend,
        }
    }

    /// Sets the relationship category.
    pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }

    /// Order-independent key, also valid for pairs built by hand or
    /// deserialized without sorting.
    pub fn key(&self) -> (&str, &str) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }

    /// Whether both ends name the same examinee.
    #[inline]
    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

/// Symmetric adjacency map: examinee → related examinees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMap {
    related: HashMap<String, BTreeSet<String>>,
}

impl RelationshipMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from relationship pairs. Self-pairs are ignored.
    pub fn from_pairs(pairs: &[RelationshipPair]) -> Self {
        let mut map = Self::new();
        for pair in pairs {
            map.insert(&pair.first, &pair.second);
        }
        map
    }

    /// Records a symmetric relationship.
    pub fn insert(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.related
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.related
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// Examinees related to `id`.
    pub fn related(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.related.get(id)
    }

    /// Whether `a` and `b` are related.
    pub fn are_related(&self, a: &str, b: &str) -> bool {
        self.related.get(a).is_some_and(|set| set.contains(b))
    }

    /// Whether no relationships are recorded.
    pub fn is_empty(&self) -> bool {
        self.related.is_empty()
    }

    /// Number of examinees with at least one relationship.
    pub fn len(&self) -> usize {
        self.related.len()
    }
}
