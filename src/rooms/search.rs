//! Exhaustive backtracking over (group, room) choices.
//!
//! # Algorithm
//!
//! Depth-first search with one decision level per group, groups taken
//! in the allocator's sorted order and rooms in catalog order. Each
//! level records the room it chose together with a snapshot of that
//! room's state before the placement; undoing a level restores the
//! snapshot. The search is iterative, so depth is bounded by the heap,
//! not the call stack.
//!
//! # Budget
//! A node limit (placements tried) and an optional wall-clock limit
//! bound the search. Running out is reported as
//! [`Infeasibility::BudgetExhausted`], distinct from a proven
//! [`Infeasibility::SearchExhausted`].
//!
//! # Complexity
//! O(r^g) placements in the worst case for g groups and r rooms.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::state::{GroupProfile, RoomState};
use crate::error::Infeasibility;
use crate::models::RoomConfig;

/// Default cap on placements tried by the backtracking search.
pub const DEFAULT_NODE_LIMIT: u64 = 1_000_000;

/// Limits on the backtracking search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum placements tried. `None` = unlimited.
    pub node_limit: Option<u64>,
    /// Maximum wall-clock time in milliseconds. `None` = unlimited.
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            node_limit: Some(DEFAULT_NODE_LIMIT),
            time_limit_ms: None,
        }
    }
}

impl SearchBudget {
    /// No limits at all.
    pub fn unlimited() -> Self {
        Self {
            node_limit: None,
            time_limit_ms: None,
        }
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit_ms(mut self, limit_ms: u64) -> Self {
        self.time_limit_ms = Some(limit_ms);
        self
    }

    /// Time limit as a `Duration`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// One decision level.
#[derive(Debug, Default)]
struct Frame {
    /// Next room index to try at this level.
    next_room: usize,
    /// Room chosen at this level and its state before the placement.
    placed: Option<(usize, RoomState)>,
}

/// Outcome of a successful search: final state of every room.
#[derive(Debug)]
pub(crate) struct SearchResult {
    pub states: Vec<RoomState>,
    pub explored: u64,
}

/// Searches for a placement of every group in `order`.
pub(crate) fn backtrack(
    profiles: &[GroupProfile],
    order: &[usize],
    rooms: &[RoomConfig],
    budget: &SearchBudget,
) -> Result<SearchResult, Infeasibility> {
    let started = Instant::now();
    let time_limit = budget.time_limit();

    let mut states: Vec<RoomState> = rooms.iter().map(RoomState::new).collect();
    let mut frames: Vec<Frame> = vec![Frame::default()];
    let mut explored: u64 = 0;
    // (depth, group) of the deepest level that found no room.
    let mut blocked: Option<(usize, usize)> = None;

    while !frames.is_empty() {
        let depth = frames.len() - 1;
        if depth == order.len() {
            return Ok(SearchResult { states, explored });
        }

        let out_of_nodes = budget.node_limit.is_some_and(|limit| explored >= limit);
        let out_of_time = time_limit.is_some_and(|limit| started.elapsed() >= limit);
        if out_of_nodes || out_of_time {
            return Err(Infeasibility::BudgetExhausted {
                explored,
                elapsed_ms: elapsed_ms(started),
            });
        }

        let frame = &mut frames[depth];
        if let Some((room, snapshot)) = frame.placed.take() {
            states[room] = snapshot;
        }

        let group = &profiles[order[depth]];
        let choice =
            (frame.next_room..rooms.len()).find(|&r| states[r].accepts(&rooms[r], group));

        match choice {
            Some(room) => {
                explored += 1;
                frame.next_room = room + 1;
                frame.placed = Some((room, states[room].clone()));
                states[room].place(group);
                frames.push(Frame::default());
            }
            None => {
                if blocked.map_or(true, |(d, _)| depth > d) {
                    blocked = Some((depth, order[depth]));
                }
                frames.pop();
            }
        }
    }

    let (color, size) = blocked
        .map(|(_, g)| (profiles[g].color, profiles[g].size()))
        .unwrap_or((0, 0));
    Err(Infeasibility::SearchExhausted {
        color,
        size,
        explored,
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn group(color: usize, size: usize) -> GroupProfile {
        GroupProfile {
            color,
            members: (0..size).map(|i| format!("G{color}M{i}")).collect(),
            years: BTreeSet::from([1]),
            subjects: BTreeSet::from(["Maths".to_string()]),
            branches: BTreeSet::from([String::new()]),
            departments: BTreeSet::from(["CSE".to_string()]),
        }
    }

    fn rooms(capacities: &[usize]) -> Vec<RoomConfig> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| RoomConfig::new(format!("R{i}"), c).unrestricted())
            .collect()
    }

    #[test]
    fn test_finds_packing_greedy_misses() {
        // 3 into R0 first leaves 1 + 3 for two groups of 2; only 3 → R1 works.
        let profiles = vec![group(0, 3), group(1, 2), group(2, 2)];
        let rooms = rooms(&[4, 3]);
        let result =
            backtrack(&profiles, &[0, 1, 2], &rooms, &SearchBudget::unlimited()).unwrap();

        assert_eq!(result.states[0].members.len(), 4);
        assert_eq!(result.states[1].members.len(), 3);
        assert!(result.states[1].members.contains(&"G0M0".to_string()));
    }

    #[test]
    fn test_exhausted_reports_blocking_group() {
        let profiles = vec![group(0, 3), group(1, 3)];
        let rooms = rooms(&[4, 2]);
        let err = backtrack(&profiles, &[0, 1], &rooms, &SearchBudget::unlimited()).unwrap_err();

        match err {
            Infeasibility::SearchExhausted { color, size, .. } => {
                assert_eq!(color, 1);
                assert_eq!(size, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_node_limit() {
        let profiles = vec![group(0, 3), group(1, 2), group(2, 2)];
        let rooms = rooms(&[4, 3]);
        let budget = SearchBudget::unlimited().with_node_limit(1);
        let err = backtrack(&profiles, &[0, 1, 2], &rooms, &budget).unwrap_err();
        assert!(matches!(
            err,
            Infeasibility::BudgetExhausted { explored: 1, .. }
        ));
    }

    #[test]
    fn test_time_limit() {
        // 13 groups of 2 into 12 rooms of 3: each room takes one group, so
        // proving infeasibility means trying every injection of 12 groups.
        let profiles: Vec<GroupProfile> = (0..13).map(|c| group(c, 2)).collect();
        let order: Vec<usize> = (0..13).collect();
        let rooms = rooms(&[3; 12]);
        let budget = SearchBudget::unlimited().with_time_limit_ms(1);

        let err = backtrack(&profiles, &order, &rooms, &budget).unwrap_err();
        match err {
            Infeasibility::BudgetExhausted { elapsed_ms, .. } => assert!(elapsed_ms >= 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_order_succeeds() {
        let result = backtrack(&[], &[], &rooms(&[5]), &SearchBudget::default()).unwrap();
        assert_eq!(result.explored, 0);
        assert!(result.states[0].members.is_empty());
    }

    #[test]
    fn test_budget_builders() {
        let b = SearchBudget::unlimited()
            .with_node_limit(10)
            .with_time_limit_ms(250);
        assert_eq!(b.node_limit, Some(10));
        assert_eq!(b.time_limit(), Some(Duration::from_millis(250)));
        assert_eq!(SearchBudget::default().node_limit, Some(DEFAULT_NODE_LIMIT));
    }
}
