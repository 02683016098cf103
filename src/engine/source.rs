//! Data source capability injected into the engine.

use crate::error::SourceError;
use crate::models::{Examinee, RelationshipPair};

/// Supplies the roster and relationship pairs for an allocation run.
///
/// Implementations wrap whatever store owns the data; the engine only
/// reads through this trait.
pub trait SeatingSource: Send + Sync {
    /// Examinees to seat.
    fn roster(&self) -> Result<Vec<Examinee>, SourceError>;

    /// Relationship pairs. An empty list means no relationship data.
    fn relationship_pairs(&self) -> Result<Vec<RelationshipPair>, SourceError>;
}

/// A source backed by owned vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    examinees: Vec<Examinee>,
    pairs: Vec<RelationshipPair>,
}

impl InMemorySource {
    /// Creates a source over a roster with no relationships.
    pub fn new(examinees: Vec<Examinee>) -> Self {
        Self {
            examinees,
            pairs: Vec::new(),
        }
    }

    /// Sets the relationship pairs.
    pub fn with_relationships(mut self, pairs: Vec<RelationshipPair>) -> Self {
        self.pairs = pairs;
        self
    }
}

impl SeatingSource for InMemorySource {
    fn roster(&self) -> Result<Vec<Examinee>, SourceError> {
        Ok(self.examinees.clone())
    }

    fn relationship_pairs(&self) -> Result<Vec<RelationshipPair>, SourceError> {
        Ok(self.pairs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamSlot;

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new(vec![Examinee::new(
            "S1",
            "Maths",
            "2024-05-01",
            ExamSlot::Morning,
        )])
        .with_relationships(vec![RelationshipPair::new("S1", "S2")]);

        assert_eq!(source.roster().unwrap().len(), 1);
        assert_eq!(source.relationship_pairs().unwrap().len(), 1);
    }
}
