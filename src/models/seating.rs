//! Seating plan (solution) model.
//!
//! A seating plan gives every allocated examinee a grid cell and a seat
//! number in their room. It may carry adjacency violations: related
//! examinees who could not be kept apart. Violations never invalidate
//! the plan; they are reported so the operator can intervene.

use serde::{Deserialize, Serialize};

/// One examinee's seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Seated examinee.
    pub examinee_id: String,
    /// Room the seat belongs to.
    pub room_id: String,
    /// 1-based row-major seat number: `y * columns + x + 1`.
    pub seat_number: usize,
    /// Column, in `[0, columns)`.
    pub x: usize,
    /// Row, in `[0, rows)`.
    pub y: usize,
}

/// The seats of one room, ordered by seat number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeating {
    pub room_id: String,
    pub columns: usize,
    pub rows: usize,
    pub seats: Vec<SeatAssignment>,
}

/// An examinee seated next to someone they are related to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyViolation {
    pub room_id: String,
    pub examinee_id: String,
    pub x: usize,
    pub y: usize,
    /// Related examinees in the 8-neighbourhood at placement time.
    pub related_neighbors: Vec<String>,
}

/// Complete seating output of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingPlan {
    /// Per-room seating, in allocation order.
    pub rooms: Vec<RoomSeating>,
    /// Unavoidable adjacencies between related examinees.
    pub violations: Vec<AdjacencyViolation>,
}

impl SeatAssignment {
    /// Creates a seat at `(x, y)` in a grid `columns` wide.
    pub fn new(
        examinee_id: impl Into<String>,
        room_id: impl Into<String>,
        x: usize,
        y: usize,
        columns: usize,
    ) -> Self {
        Self {
            examinee_id: examinee_id.into(),
            room_id: room_id.into(),
            seat_number: y * columns + x + 1,
            x,
            y,
        }
    }
}

impl RoomSeating {
    /// Creates an empty seating for a `columns × rows` grid.
    pub fn new(room_id: impl Into<String>, columns: usize, rows: usize) -> Self {
        Self {
            room_id: room_id.into(),
            columns,
            rows,
            seats: Vec::new(),
        }
    }

    /// Seat held by an examinee.
    pub fn seat_of(&self, examinee_id: &str) -> Option<&SeatAssignment> {
        self.seats.iter().find(|s| s.examinee_id == examinee_id)
    }

    /// Number of occupied seats.
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.seats.len()
    }
}

impl AdjacencyViolation {
    /// Creates a violation record.
    pub fn new(
        room_id: impl Into<String>,
        examinee_id: impl Into<String>,
        x: usize,
        y: usize,
        related_neighbors: Vec<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            examinee_id: examinee_id.into(),
            x,
            y,
            related_neighbors,
        }
    }
}

impl SeatingPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room's seating.
    pub fn add_room(&mut self, room: RoomSeating) {
        self.rooms.push(room);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: AdjacencyViolation) {
        self.violations.push(violation);
    }

    /// Whether every related pair was kept apart.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Seating for a room.
    pub fn room(&self, room_id: &str) -> Option<&RoomSeating> {
        self.rooms.iter().find(|r| r.room_id == room_id)
    }

    /// Seat of an examinee, in whichever room.
    pub fn seat_for(&self, examinee_id: &str) -> Option<&SeatAssignment> {
        self.rooms.iter().find_map(|r| r.seat_of(examinee_id))
    }

    /// Violations recorded in a room.
    pub fn violations_for_room(&self, room_id: &str) -> Vec<&AdjacencyViolation> {
        self.violations
            .iter()
            .filter(|v| v.room_id == room_id)
            .collect()
    }

    /// Total seated examinees.
    pub fn seated_count(&self) -> usize {
        self.rooms.iter().map(RoomSeating::occupancy).sum()
    }
}
