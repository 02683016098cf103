//! Mutable per-room packing state and the acceptance predicate.

use std::collections::{BTreeSet, HashMap};

use crate::error::AllocationError;
use crate::graph::ColorGroup;
use crate::models::{within_ceiling, Examinee, RoomConfig};

/// A color group with its diversity footprint precomputed.
#[derive(Debug, Clone)]
pub(crate) struct GroupProfile {
    pub color: usize,
    pub members: Vec<String>,
    pub years: BTreeSet<u8>,
    pub subjects: BTreeSet<String>,
    pub branches: BTreeSet<String>,
    pub departments: BTreeSet<String>,
}

impl GroupProfile {
    /// Builds a profile, resolving members against the roster.
    pub fn build(
        group: &ColorGroup,
        roster: &HashMap<&str, &Examinee>,
    ) -> Result<Self, AllocationError> {
        let mut profile = Self {
            color: group.color,
            members: group.members.clone(),
            years: BTreeSet::new(),
            subjects: BTreeSet::new(),
            branches: BTreeSet::new(),
            departments: BTreeSet::new(),
        };

        for id in &group.members {
            let e = roster
                .get(id.as_str())
                .ok_or_else(|| AllocationError::UnknownExaminee(id.clone()))?;
            profile.years.insert(e.year);
            profile.subjects.insert(e.subject.clone());
            profile.branches.insert(e.branch.clone());
            profile.departments.insert(e.department.clone());
        }

        Ok(profile)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Occupancy of one room during packing.
///
/// Cheap to clone; the backtracking search snapshots it before each
/// placement and restores the snapshot on undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoomState {
    pub remaining: usize,
    pub years: BTreeSet<u8>,
    pub subjects: BTreeSet<String>,
    pub branches: BTreeSet<String>,
    pub departments: BTreeSet<String>,
    pub members: Vec<String>,
}

impl RoomState {
    pub fn new(room: &RoomConfig) -> Self {
        Self {
            remaining: room.capacity,
            years: BTreeSet::new(),
            subjects: BTreeSet::new(),
            branches: BTreeSet::new(),
            departments: BTreeSet::new(),
            members: Vec::new(),
        }
    }

    /// Whether `room`, in this state, can take the whole group.
    ///
    /// Requires spare capacity, every member's year and branch on the
    /// room's allow-lists, and every diversity ceiling still met once the
    /// group's values are merged in.
    pub fn accepts(&self, room: &RoomConfig, group: &GroupProfile) -> bool {
        group.size() <= self.remaining
            && group.years.iter().all(|&y| room.allows_year(y))
            && group.branches.iter().all(|b| room.allows_branch(b))
            && within_ceiling(union_len(&self.years, &group.years), room.max_years)
            && within_ceiling(
                union_len(&self.departments, &group.departments),
                room.max_departments,
            )
            && within_ceiling(union_len(&self.subjects, &group.subjects), room.max_subjects)
            && within_ceiling(union_len(&self.branches, &group.branches), room.max_branches)
    }

    /// Places the group. The caller must have checked [`accepts`](Self::accepts).
    pub fn place(&mut self, group: &GroupProfile) {
        self.remaining -= group.size();
        self.years.extend(group.years.iter().copied());
        self.subjects.extend(group.subjects.iter().cloned());
        self.branches.extend(group.branches.iter().cloned());
        self.departments.extend(group.departments.iter().cloned());
        self.members.extend(group.members.iter().cloned());
    }
}

fn union_len<T: Ord>(current: &BTreeSet<T>, incoming: &BTreeSet<T>) -> usize {
    current.len() + incoming.difference(current).count()
}
