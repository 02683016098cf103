//! Room allocation (stage-three input) model.
//!
//! A room allocation maps each used room to the examinees packed into
//! it. A valid allocation places every examinee exactly once and keeps
//! each room within its capacity and diversity ceilings.

use serde::{Deserialize, Serialize};

/// Examinees packed into one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignment {
    /// Room identifier.
    pub room_id: String,
    /// Examinee IDs, in placement order.
    pub examinee_ids: Vec<String>,
}

/// A complete room allocation for one run.
///
/// Rooms appear in catalog order; rooms that received nobody are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAllocation {
    pub assignments: Vec<RoomAssignment>,
}

impl RoomAssignment {
    /// Creates an assignment.
    pub fn new(room_id: impl Into<String>, examinee_ids: Vec<String>) -> Self {
        Self {
            room_id: room_id.into(),
            examinee_ids,
        }
    }

    /// Number of examinees in the room.
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.examinee_ids.len()
    }
}

impl RoomAllocation {
    /// Creates an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room assignment.
    pub fn add_assignment(&mut self, assignment: RoomAssignment) {
        self.assignments.push(assignment);
    }

    /// Finds the assignment for a room.
    pub fn assignment_for_room(&self, room_id: &str) -> Option<&RoomAssignment> {
        self.assignments.iter().find(|a| a.room_id == room_id)
    }

    /// The room an examinee was placed in.
    pub fn room_of(&self, examinee_id: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.examinee_ids.iter().any(|id| id == examinee_id))
            .map(|a| a.room_id.as_str())
    }

    /// Total examinees placed.
    pub fn examinee_count(&self) -> usize {
        self.assignments.iter().map(RoomAssignment::occupancy).sum()
    }

    /// Number of rooms in use.
    pub fn room_count(&self) -> usize {
        self.assignments.len()
    }
}
