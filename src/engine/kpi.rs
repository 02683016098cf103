//! Allocation quality metrics (KPIs).
//!
//! Computes summary indicators from a completed allocation and the room
//! catalog it was made against.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Seated | Examinees with a seat |
//! | Rooms used | Rooms with at least one occupant |
//! | Utilization | Occupants / capacity, per used room |
//! | Avg utilization | Mean over used rooms |
//! | Adjacency violations | Related examinees seated adjacent |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::AllocationOutcome;
use crate::models::{within_ceiling, Examinee, RoomAllocation, RoomConfig};

/// Allocation performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationKpi {
    /// Examinees with a seat.
    pub seated: usize,
    /// Rooms with at least one occupant.
    pub rooms_used: usize,
    /// Per-room utilization (0.0..1.0).
    pub utilization_by_room: HashMap<String, f64>,
    /// Mean utilization over used rooms (0.0..1.0).
    pub avg_utilization: f64,
    /// Unavoidable adjacencies between related examinees.
    pub adjacency_violations: usize,
}

impl AllocationKpi {
    /// Computes KPIs from an outcome and its room catalog.
    pub fn calculate(outcome: &AllocationOutcome, rooms: &[RoomConfig]) -> Self {
        let utilization_by_room: HashMap<String, f64> = outcome
            .seating
            .rooms
            .iter()
            .filter_map(|seating| {
                let room = rooms.iter().find(|r| r.id == seating.room_id)?;
                if room.capacity == 0 {
                    return None;
                }
                Some((
                    room.id.clone(),
                    seating.occupancy() as f64 / room.capacity as f64,
                ))
            })
            .collect();

        let avg_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_room.values().sum();
            sum / utilization_by_room.len() as f64
        };

        Self {
            seated: outcome.seating.seated_count(),
            rooms_used: outcome.seating.rooms.len(),
            utilization_by_room,
            avg_utilization,
            adjacency_violations: outcome.seating.violations.len(),
        }
    }

    /// Whether the allocation meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_utilization: f64, max_violations: usize) -> bool {
        self.avg_utilization >= min_utilization && self.adjacency_violations <= max_violations
    }
}

/// Distinct attribute values seated together in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDiversity {
    pub room_id: String,
    pub subjects: BTreeSet<String>,
    pub branches: BTreeSet<String>,
    pub departments: BTreeSet<String>,
    pub years: BTreeSet<u8>,
}

impl RoomDiversity {
    /// Recomputes the diversity of every allocated room.
    ///
    /// Ids missing from `examinees` are skipped.
    pub fn measure(allocation: &RoomAllocation, examinees: &[Examinee]) -> Vec<Self> {
        let roster: HashMap<&str, &Examinee> =
            examinees.iter().map(|e| (e.id.as_str(), e)).collect();

        allocation
            .assignments
            .iter()
            .map(|a| {
                let mut d = Self {
                    room_id: a.room_id.clone(),
                    subjects: BTreeSet::new(),
                    branches: BTreeSet::new(),
                    departments: BTreeSet::new(),
                    years: BTreeSet::new(),
                };
                for e in a.examinee_ids.iter().filter_map(|id| roster.get(id.as_str())) {
                    d.subjects.insert(e.subject.clone());
                    d.branches.insert(e.branch.clone());
                    d.departments.insert(e.department.clone());
                    d.years.insert(e.year);
                }
                d
            })
            .collect()
    }

    /// Whether the room's ceilings and allow-lists hold.
    pub fn satisfies(&self, room: &RoomConfig) -> bool {
        within_ceiling(self.subjects.len(), room.max_subjects)
            && within_ceiling(self.branches.len(), room.max_branches)
            && within_ceiling(self.departments.len(), room.max_departments)
            && within_ceiling(self.years.len(), room.max_years)
            && self.years.iter().all(|&y| room.allows_year(y))
            && self.branches.iter().all(|b| room.allows_branch(b))
    }
}
