//! Subject model.

use serde::{Deserialize, Serialize};

use super::SessionType;

/// A subject taught to every section of one year level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Course code (e.g., "MATH101").
    pub code: String,
    /// Year level whose sections take this subject.
    pub year: u8,
    /// Target one-hour lectures per week.
    pub weekly_hours: u32,
    /// Whether each batch gets a weekly lab.
    pub has_lab: bool,
    /// Whether each batch gets a weekly tutorial.
    pub has_tutorial: bool,
}

impl Subject {
    /// Creates a lecture-only subject with no weekly hours.
    pub fn new(id: impl Into<String>, code: impl Into<String>, year: u8) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            year,
            weekly_hours: 0,
            has_lab: false,
            has_tutorial: false,
        }
    }

    /// Sets the weekly lecture target.
    pub fn with_weekly_hours(mut self, hours: u32) -> Self {
        self.weekly_hours = hours;
        self
    }

    /// Enables per-batch labs.
    pub fn with_lab(mut self) -> Self {
        self.has_lab = true;
        self
    }

    /// Enables per-batch tutorials.
    pub fn with_tutorial(mut self) -> Self {
        self.has_tutorial = true;
        self
    }

    /// Batched session types this subject requires, in scheduling order.
    pub fn batched_sessions(&self) -> Vec<SessionType> {
        let mut out = Vec::with_capacity(2);
        if self.has_lab {
            out.push(SessionType::Lab);
        }
        if self.has_tutorial {
            out.push(SessionType::Tutorial);
        }
        out
    }
}
