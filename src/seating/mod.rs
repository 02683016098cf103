//! Seat placement inside allocated rooms.
//!
//! # Algorithm
//!
//! For each room of a [`RoomAllocation`]:
//!
//! 1. Interleave the room's examinees by academic year.
//! 2. Without relationship data, assign cells from the spread fill order
//!    ([`spread_positions`]).
//! 3. With relationship data, scan cells row-major for each examinee and
//!    take the first free cell whose occupied 8-neighborhood holds no
//!    related examinee. If none exists, apply the [`FallbackPolicy`] and
//!    record an [`AdjacencyViolation`].
//!
//! # Complexity
//! O(n · c) per room with relationships, where c = grid cells; O(c)
//! without.

mod interleave;
mod layout;

pub use interleave::interleave_by_year;
pub use layout::{neighborhood, row_major, spread_positions};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::AllocationError;
use crate::models::{
    AdjacencyViolation, Examinee, RelationshipMap, RoomAllocation, RoomConfig, RoomSeating,
    SeatAssignment, SeatingPlan,
};

/// Cell choice when every free cell touches a related examinee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// First free cell in row-major order.
    #[default]
    FirstOpen,
    /// Free cell with the fewest related neighbors; ties row-major.
    FewestAdjacent,
}

/// Seat placement options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    pub fallback: FallbackPolicy,
}

impl PlacementOptions {
    /// Sets the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Places allocated examinees onto room grids.
///
/// # Example
///
/// ```
/// use u_seating::models::{Examinee, ExamSlot, RoomAllocation, RoomAssignment, RoomConfig};
/// use u_seating::seating::SeatPlacer;
///
/// let roster = vec![
///     Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning),
///     Examinee::new("S2", "Physics", "2024-05-01", ExamSlot::Afternoon),
/// ];
/// let rooms = vec![RoomConfig::new("R1", 30)];
/// let mut allocation = RoomAllocation::new();
/// allocation.add_assignment(RoomAssignment::new("R1", vec!["S1".into(), "S2".into()]));
///
/// let plan = SeatPlacer::new(&roster).place(&allocation, &rooms).unwrap();
/// assert_eq!(plan.seated_count(), 2);
/// assert_eq!(plan.seat_for("S2").unwrap().seat_number, 3);
/// ```
#[derive(Debug, Clone)]
pub struct SeatPlacer<'a> {
    examinees: &'a [Examinee],
    relationships: Option<&'a RelationshipMap>,
    options: PlacementOptions,
}

impl<'a> SeatPlacer<'a> {
    /// Creates a placer over the session roster.
    pub fn new(examinees: &'a [Examinee]) -> Self {
        Self {
            examinees,
            relationships: None,
            options: PlacementOptions::default(),
        }
    }

    /// Enables relationship-aware placement. An empty map behaves as none.
    pub fn with_relationships(mut self, relationships: &'a RelationshipMap) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Sets placement options.
    pub fn with_options(mut self, options: PlacementOptions) -> Self {
        self.options = options;
        self
    }

    /// Seats every allocated examinee.
    ///
    /// Rooms appear in allocation order; seats within a room are sorted by
    /// seat number.
    ///
    /// # Errors
    /// - [`AllocationError::UnknownRoom`] for a room missing from `rooms`.
    /// - [`AllocationError::UnknownExaminee`] for an id missing from the roster.
    /// - [`AllocationError::GridOverflow`] if a room holds more examinees
    ///   than grid cells.
    pub fn place(
        &self,
        allocation: &RoomAllocation,
        rooms: &[RoomConfig],
    ) -> Result<SeatingPlan, AllocationError> {
        let roster: HashMap<&str, &Examinee> =
            self.examinees.iter().map(|e| (e.id.as_str(), e)).collect();
        let relationships = self.relationships.filter(|m| !m.is_empty());

        let mut plan = SeatingPlan::new();
        for assignment in &allocation.assignments {
            let room = rooms
                .iter()
                .find(|r| r.id == assignment.room_id)
                .ok_or_else(|| AllocationError::UnknownRoom(assignment.room_id.clone()))?;

            let occupants = assignment.occupancy();
            let cells = room.cell_count();
            if occupants > cells {
                return Err(AllocationError::GridOverflow {
                    room_id: room.id.clone(),
                    occupants,
                    cells,
                });
            }

            let members = assignment
                .examinee_ids
                .iter()
                .map(|id| {
                    roster
                        .get(id.as_str())
                        .copied()
                        .ok_or_else(|| AllocationError::UnknownExaminee(id.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let queue = interleave_by_year(&members);

            let (mut seating, violations) = match relationships {
                Some(map) => self.place_separated(room, &queue, map),
                None => (place_spread(room, &queue), Vec::new()),
            };
            seating.seats.sort_by_key(|s| s.seat_number);

            debug!(
                event = "room_seated",
                room = %room.id,
                seated = seating.occupancy(),
                violations = violations.len()
            );
            plan.add_room(seating);
            for v in violations {
                warn!(
                    event = "adjacency_violation",
                    room = %v.room_id,
                    examinee = %v.examinee_id,
                    x = v.x,
                    y = v.y,
                    neighbors = ?v.related_neighbors,
                    "related examinee seated adjacent; no separated cell left"
                );
                plan.add_violation(v);
            }
        }

        Ok(plan)
    }

    fn place_separated(
        &self,
        room: &RoomConfig,
        queue: &[&Examinee],
        relationships: &RelationshipMap,
    ) -> (RoomSeating, Vec<AdjacencyViolation>) {
        let (columns, rows) = (room.columns, room.rows);
        let mut grid: Vec<Option<&str>> = vec![None; columns * rows];
        let mut seating = RoomSeating::new(&room.id, columns, rows);
        let mut violations = Vec::new();

        for e in queue {
            let related_around = |grid: &[Option<&str>], x: usize, y: usize| -> Vec<String> {
                neighborhood(x, y, columns, rows)
                    .filter_map(|(nx, ny)| grid[ny * columns + nx])
                    .filter(|other| relationships.are_related(&e.id, other))
                    .map(str::to_string)
                    .collect()
            };

            let free: Vec<(usize, usize)> = row_major(columns, rows)
                .filter(|&(x, y)| grid[y * columns + x].is_none())
                .collect();

            let clean = free
                .iter()
                .copied()
                .find(|&(x, y)| related_around(&grid, x, y).is_empty());

            let (x, y) = match clean {
                Some(cell) => cell,
                None => {
                    // Occupants never exceed cells, so a free cell exists.
                    let fallback = match self.options.fallback {
                        FallbackPolicy::FirstOpen => free.first().copied(),
                        FallbackPolicy::FewestAdjacent => free
                            .iter()
                            .copied()
                            .min_by_key(|&(x, y)| related_around(&grid, x, y).len()),
                    };
                    let Some((x, y)) = fallback else { break };
                    violations.push(AdjacencyViolation::new(
                        &room.id,
                        &e.id,
                        x,
                        y,
                        related_around(&grid, x, y),
                    ));
                    (x, y)
                }
            };

            grid[y * columns + x] = Some(e.id.as_str());
            seating
                .seats
                .push(SeatAssignment::new(&e.id, &room.id, x, y, columns));
        }

        (seating, violations)
    }
}

fn place_spread(room: &RoomConfig, queue: &[&Examinee]) -> RoomSeating {
    let mut seating = RoomSeating::new(&room.id, room.columns, room.rows);
    let cells = spread_positions(queue.len(), room.columns, room.rows);
    for (e, (x, y)) in queue.iter().zip(cells) {
        seating
            .seats
            .push(SeatAssignment::new(&e.id, &room.id, x, y, room.columns));
    }
    seating
}
