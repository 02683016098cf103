//! Input validation for allocation requests.
//!
//! Checks structural integrity of the roster, relationship pairs and room
//! catalog before the pipeline starts, so that algorithms never discover
//! malformed data mid-run. Detects:
//! - Duplicate examinee IDs
//! - Missing required examinee fields
//! - Academic year 0
//! - Rooms without capacity or with a degenerate grid
//! - Grids smaller than the room's capacity
//! - Relationship pairs naming the same examinee twice
//!
//! Room identifiers are assumed unique; the catalog's owner guarantees it.

use crate::models::{Examinee, RelationshipPair, RoomConfig};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two examinees share the same ID.
    DuplicateId,
    /// A required examinee field is empty.
    MissingField,
    /// Academic year is 0.
    InvalidYear,
    /// Room has zero capacity or a zero-sized grid.
    InvalidRoom,
    /// Room grid has fewer cells than seats.
    GridTooSmall,
    /// Relationship pair names one examinee on both ends.
    SelfRelationship,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of one allocation run.
///
/// Checks:
/// 1. No duplicate examinee IDs
/// 2. Every examinee has an ID, subject, exam date and department
/// 3. Every academic year is at least 1
/// 4. Every room has positive capacity, columns and rows
/// 5. Every room grid holds at least `capacity` cells
/// 6. No relationship pair is a self-pair
///
/// Relationship pairs naming examinees absent from the roster are not
/// errors; they are ignored downstream.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    examinees: &[Examinee],
    relationships: &[RelationshipPair],
    rooms: &[RoomConfig],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for e in examinees {
        if !e.id.is_empty() && !ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate examinee ID: {}", e.id),
            ));
        }

        let required = [
            ("id", &e.id),
            ("subject", &e.subject),
            ("exam_date", &e.exam_date),
            ("department", &e.department),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    format!("Examinee '{}' has no {field}", e.id),
                ));
            }
        }

        if e.year == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidYear,
                format!("Examinee '{}' has academic year 0", e.id),
            ));
        }
    }

    for room in rooms {
        if room.capacity == 0 || room.columns == 0 || room.rows == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRoom,
                format!(
                    "Room '{}' has capacity {} and grid {}x{}",
                    room.id, room.capacity, room.columns, room.rows
                ),
            ));
        } else if room.cell_count() < room.capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::GridTooSmall,
                format!(
                    "Room '{}' grid {}x{} has fewer cells than its capacity {}",
                    room.id, room.columns, room.rows, room.capacity
                ),
            ));
        }
    }

    for pair in relationships {
        if pair.is_self_pair() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfRelationship,
                format!("Relationship pairs examinee '{}' with itself", pair.first),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
