//! Student section model.

use serde::{Deserialize, Serialize};

/// A group of students of one year level that shares a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Display name; batch names derive from it.
    pub name: String,
    /// Year level; selects the subjects this section takes.
    pub year: u8,
    /// Enrolled students.
    pub student_count: u32,
}

impl Section {
    /// Creates a section with no students.
    pub fn new(id: impl Into<String>, name: impl Into<String>, year: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            year,
            student_count: 0,
        }
    }

    /// Sets the enrolled student count.
    pub fn with_student_count(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }
}
