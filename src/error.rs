//! Error types for the allocation pipeline.
//!
//! Only room allocation and malformed input can abort a run. Graph
//! construction and coloring never fail, and unavoidable adjacency
//! between related examinees is reported inside the
//! [`SeatingPlan`](crate::models::SeatingPlan), not as an error.

use thiserror::Error;

use crate::validation::ValidationError;

/// Fatal outcome of an allocation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// More examinees than seats across the whole catalog.
    #[error("insufficient room capacity: need {required} seats, have {available} (short by {shortage})")]
    CapacityExceeded {
        required: usize,
        available: usize,
        shortage: usize,
    },

    /// No packing satisfies every room constraint.
    #[error("infeasible allocation: {0}")]
    InfeasibleAllocation(#[from] Infeasibility),

    /// Input rejected at the boundary; carries every problem found.
    #[error("invalid input: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A group or room assignment names an examinee not on the roster.
    #[error("unknown examinee '{0}'")]
    UnknownExaminee(String),

    /// A room assignment names a room not in the catalog.
    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    /// A room received more examinees than its grid has cells.
    #[error("room '{room_id}' has {cells} grid cells for {occupants} examinees")]
    GridOverflow {
        room_id: String,
        occupants: usize,
        cells: usize,
    },

    /// The injected data source failed to supply the roster.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Why the room allocator gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasibility {
    /// Backtracking explored every branch. `color`/`size` identify the
    /// group that blocked the deepest partial assignment.
    #[error(
        "no room can take group {color} ({size} examinees) under the current constraints \
         after {explored} placements; add rooms, raise capacity or relax ceilings"
    )]
    SearchExhausted {
        color: usize,
        size: usize,
        explored: u64,
    },

    /// The search budget ran out before a verdict.
    #[error("search budget exhausted after {explored} placements ({elapsed_ms} ms)")]
    BudgetExhausted { explored: u64, elapsed_ms: u64 },
}

/// Failure of an injected [`SeatingSource`](crate::engine::SeatingSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("data source returned malformed data: {0}")]
    Malformed(String),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map_or("none", |e| e.message.as_str())
}

/// Result type alias for allocation operations.
pub type Result<T> = std::result::Result<T, AllocationError>;
