//! Examinee model.
//!
//! An examinee is one candidate sitting one exam paper. The roster is
//! supplied wholesale by an external system and treated as immutable for
//! the duration of an allocation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An examinee to be seated.
///
/// Two examinees are in *hard conflict* when they share the same
/// [`ExamSession`] (identical date and time slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examinee {
    /// Unique, stable examinee identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Exam subject (paper code or title).
    pub subject: String,
    /// Exam date. Compared verbatim; the caller chooses the format.
    pub exam_date: String,
    /// Exam time slot.
    pub exam_slot: ExamSlot,
    /// Academic department.
    pub department: String,
    /// Branch (programme / specialisation).
    #[serde(default)]
    pub branch: String,
    /// Academic year (1-based).
    pub year: u8,
    /// Administrative section or batch.
    #[serde(default)]
    pub batch: String,
}

/// Exam time slot within a day.
///
/// Slots are ordered chronologically; custom slots sort after the
/// standard three, by label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamSlot {
    Morning,
    Afternoon,
    Evening,
    /// Institution-specific slot label.
    Custom(String),
}

/// A (date, slot) pair identifying one sitting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExamSession {
    pub date: String,
    pub slot: ExamSlot,
}

impl Examinee {
    /// Creates an examinee in year 1 with empty department, branch and batch.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        exam_date: impl Into<String>,
        exam_slot: ExamSlot,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subject: subject.into(),
            exam_date: exam_date.into(),
            exam_slot,
            department: String::new(),
            branch: String::new(),
            year: 1,
            batch: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Sets the academic year.
    pub fn with_year(mut self, year: u8) -> Self {
        self.year = year;
        self
    }

    /// Sets the section / batch.
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = batch.into();
        self
    }

    /// The sitting this examinee belongs to.
    pub fn session(&self) -> ExamSession {
        ExamSession {
            date: self.exam_date.clone(),
            slot: self.exam_slot.clone(),
        }
    }

    /// Whether both examinees sit at the same date and time.
    #[inline]
    pub fn shares_session(&self, other: &Examinee) -> bool {
        self.exam_date == other.exam_date && self.exam_slot == other.exam_slot
    }

    /// Key used for same-section soft conflicts: (batch, year, department).
    pub fn section_key(&self) -> (&str, u8, &str) {
        (self.batch.as_str(), self.year, self.department.as_str())
    }
}

impl fmt::Display for ExamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamSlot::Morning => write!(f, "Morning"),
            ExamSlot::Afternoon => write!(f, "Afternoon"),
            ExamSlot::Evening => write!(f, "Evening"),
            ExamSlot::Custom(label) => write!(f, "{label}"),
        }
    }
}

impl fmt::Display for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.slot)
    }
}
