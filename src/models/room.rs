//! Room model.
//!
//! Rooms are the bins of the allocation problem. Each room has a seat
//! capacity, a rectangular seat grid, and diversity ceilings limiting
//! how many distinct subjects, branches, departments and years may share
//! it. A ceiling of `None` or `Some(0)` means unlimited; room catalogs
//! commonly encode "no limit" as 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default grid width (columns).
pub const DEFAULT_COLUMNS: usize = 6;
/// Default grid depth (rows).
pub const DEFAULT_ROWS: usize = 5;
/// Default ceiling on distinct departments and years per room.
pub const DEFAULT_DIVERSITY_CEILING: usize = 2;

/// Configuration of one exam room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room identifier.
    pub id: String,
    /// Number of seats.
    pub capacity: usize,
    /// Grid columns (x axis).
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Grid rows (y axis).
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Maximum distinct subjects.
    #[serde(default)]
    pub max_subjects: Option<usize>,
    /// Maximum distinct branches.
    #[serde(default)]
    pub max_branches: Option<usize>,
    /// Maximum distinct departments.
    #[serde(default = "default_ceiling")]
    pub max_departments: Option<usize>,
    /// Maximum distinct academic years.
    #[serde(default = "default_ceiling")]
    pub max_years: Option<usize>,
    /// Years admitted to this room. `None` admits every year.
    #[serde(default)]
    pub allowed_years: Option<BTreeSet<u8>>,
    /// Branches admitted to this room. `None` admits every branch.
    #[serde(default)]
    pub allowed_branches: Option<BTreeSet<String>>,
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_ceiling() -> Option<usize> {
    Some(DEFAULT_DIVERSITY_CEILING)
}

impl RoomConfig {
    /// Creates a room with the default 6×5 grid, at most two departments
    /// and two years, and no other restrictions.
    pub fn new(id: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            capacity,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            max_subjects: None,
            max_branches: None,
            max_departments: default_ceiling(),
            max_years: default_ceiling(),
            allowed_years: None,
            allowed_branches: None,
        }
    }

    /// Sets the seat grid.
    pub fn with_grid(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Sets the subject ceiling (`None` = unlimited).
    pub fn with_max_subjects(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.max_subjects = limit.into();
        self
    }

    /// Sets the branch ceiling (`None` = unlimited).
    pub fn with_max_branches(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.max_branches = limit.into();
        self
    }

    /// Sets the department ceiling (`None` = unlimited).
    pub fn with_max_departments(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.max_departments = limit.into();
        self
    }

    /// Sets the year ceiling (`None` = unlimited).
    pub fn with_max_years(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.max_years = limit.into();
        self
    }

    /// Removes every diversity ceiling.
    pub fn unrestricted(self) -> Self {
        self.with_max_subjects(None)
            .with_max_branches(None)
            .with_max_departments(None)
            .with_max_years(None)
    }

    /// Restricts the room to the given years.
    pub fn with_allowed_years(mut self, years: impl IntoIterator<Item = u8>) -> Self {
        self.allowed_years = Some(years.into_iter().collect());
        self
    }

    /// Restricts the room to the given branches.
    pub fn with_allowed_branches<S: Into<String>>(
        mut self,
        branches: impl IntoIterator<Item = S>,
    ) -> Self {
        self.allowed_branches = Some(branches.into_iter().map(Into::into).collect());
        self
    }

    /// Number of grid cells (columns × rows).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Whether the room admits `year`.
    pub fn allows_year(&self, year: u8) -> bool {
        self.allowed_years
            .as_ref()
            .map_or(true, |years| years.contains(&year))
    }

    /// Whether the room admits `branch`.
    pub fn allows_branch(&self, branch: &str) -> bool {
        self.allowed_branches
            .as_ref()
            .map_or(true, |branches| branches.contains(branch))
    }
}

/// Whether `distinct` values stay within an optional ceiling. A zero
/// ceiling is unlimited.
#[inline]
pub(crate) fn within_ceiling(distinct: usize, ceiling: Option<usize>) -> bool {
    match ceiling {
        None | Some(0) => true,
        Some(max) => distinct <= max,
    }
}
