//! Seating domain models.
//!
//! Provides the data types flowing through the allocation pipeline:
//! externally owned inputs (examinees, relationships, rooms) and the
//! per-run outputs (room allocation, seating plan).
//!
//! # Pipeline Mapping
//!
//! | Stage | Consumes | Produces |
//! |-------|----------|----------|
//! | Conflict graph | `Examinee`, `RelationshipPair` | `ConflictGraph` |
//! | Coloring | `ConflictGraph` | `ColorGroup` |
//! | Room allocation | `ColorGroup`, `RoomConfig` | `RoomAllocation` |
//! | Seat placement | `RoomAllocation`, `RelationshipMap` | `SeatingPlan` |

mod allocation;
mod examinee;
mod relationship;
mod room;
mod seating;

pub use allocation::{RoomAllocation, RoomAssignment};
pub use examinee::{ExamSession, ExamSlot, Examinee};
pub use relationship::{RelationshipKind, RelationshipMap, RelationshipPair};
pub use room::{
    RoomConfig, DEFAULT_COLUMNS, DEFAULT_DIVERSITY_CEILING, DEFAULT_ROWS,
};
pub(crate) use room::within_ceiling;
pub use seating::{AdjacencyViolation, RoomSeating, SeatAssignment, SeatingPlan};
