//! Constrained packing of color groups into rooms.
//!
//! # Algorithm
//!
//! 1. Reject immediately if the roster exceeds total room capacity.
//! 2. First-fit decreasing: groups by descending size; for each group,
//!    rooms by descending remaining capacity; the first room whose
//!    acceptance predicate holds takes the whole group.
//! 3. If any group finds no room, discard the greedy attempt and run an
//!    exhaustive backtracking search with the same predicate.
//!
//! A group is never split across rooms. Both orderings are stable, so
//! equal sizes and capacities fall back to color order and catalog
//! order respectively, which keeps the result deterministic.
//!
//! # Complexity
//! FFD: O(g · r log r). Backtracking: exponential in g, bounded by
//! [`SearchBudget`].
//!
//! # References
//! - Johnson (1973), "Near-optimal bin packing algorithms"
//! - Coffman, Garey & Johnson (1996), "Approximation algorithms for bin
//!   packing: a survey"

mod search;
mod state;

pub use search::{SearchBudget, DEFAULT_NODE_LIMIT};

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::AllocationError;
use crate::graph::ColorGroup;
use crate::models::{Examinee, RoomAllocation, RoomAssignment, RoomConfig};
use state::{GroupProfile, RoomState};

/// Packs color groups into rooms.
///
/// # Example
///
/// ```
/// use u_seating::graph::ColorGroup;
/// use u_seating::models::{Examinee, ExamSlot, RoomConfig};
/// use u_seating::rooms::RoomAllocator;
///
/// let roster = vec![
///     Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
///     Examinee::new("S2", "Maths", "2024-05-01", ExamSlot::Afternoon).with_department("CSE"),
/// ];
/// let groups = vec![ColorGroup { color: 0, members: vec!["S1".into(), "S2".into()] }];
/// let rooms = vec![RoomConfig::new("R1", 30)];
///
/// let allocation = RoomAllocator::new().allocate(&groups, &roster, &rooms).unwrap();
/// assert_eq!(allocation.room_of("S2"), Some("R1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoomAllocator {
    budget: SearchBudget,
}

impl RoomAllocator {
    /// Creates an allocator with the default search budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backtracking budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Allocates every group to exactly one room.
    ///
    /// # Errors
    /// - [`AllocationError::CapacityExceeded`] if the roster outgrows the catalog.
    /// - [`AllocationError::InfeasibleAllocation`] if no packing exists or
    ///   the search budget ran out.
    /// - [`AllocationError::UnknownExaminee`] if a group names someone
    ///   missing from `examinees`.
    pub fn allocate(
        &self,
        groups: &[ColorGroup],
        examinees: &[Examinee],
        rooms: &[RoomConfig],
    ) -> Result<RoomAllocation, AllocationError> {
        let required: usize = groups.iter().map(ColorGroup::size).sum();
        let available: usize = rooms.iter().map(|r| r.capacity).sum();
        if required > available {
            return Err(AllocationError::CapacityExceeded {
                required,
                available,
                shortage: required - available,
            });
        }

        let roster: HashMap<&str, &Examinee> =
            examinees.iter().map(|e| (e.id.as_str(), e)).collect();
        let profiles = groups
            .iter()
            .map(|g| GroupProfile::build(g, &roster))
            .collect::<Result<Vec<_>, _>>()?;

        let mut order: Vec<usize> = (0..profiles.len()).collect();
        order.sort_by(|&a, &b| profiles[b].size().cmp(&profiles[a].size()));

        match first_fit_decreasing(&profiles, &order, rooms) {
            Ok(states) => {
                debug!(event = "ffd_success", groups = profiles.len());
                Ok(collect_allocation(rooms, states))
            }
            Err(blocked) => {
                warn!(
                    event = "ffd_failed",
                    color = profiles[blocked].color,
                    size = profiles[blocked].size(),
                    "first-fit decreasing found no room; falling back to backtracking"
                );
                let result = search::backtrack(&profiles, &order, rooms, &self.budget)?;
                info!(event = "backtracking_success", explored = result.explored);
                Ok(collect_allocation(rooms, result.states))
            }
        }
    }
}

/// Greedy pass. On failure returns the index of the group that found no room.
fn first_fit_decreasing(
    profiles: &[GroupProfile],
    order: &[usize],
    rooms: &[RoomConfig],
) -> Result<Vec<RoomState>, usize> {
    let mut states: Vec<RoomState> = rooms.iter().map(RoomState::new).collect();
    let mut room_order: Vec<usize> = (0..rooms.len()).collect();

    for &g in order {
        let group = &profiles[g];
        room_order.sort_by_key(|&r| r);
        room_order.sort_by(|&a, &b| states[b].remaining.cmp(&states[a].remaining));

        let room = room_order
            .iter()
            .copied()
            .find(|&r| states[r].accepts(&rooms[r], group))
            .ok_or(g)?;
        states[room].place(group);
    }

    Ok(states)
}

fn collect_allocation(rooms: &[RoomConfig], states: Vec<RoomState>) -> RoomAllocation {
    let mut allocation = RoomAllocation::new();
    for (room, state) in rooms.iter().zip(states) {
        if !state.members.is_empty() {
            allocation.add_assignment(RoomAssignment::new(&room.id, state.members));
        }
    }
    allocation
}
