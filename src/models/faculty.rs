//! Faculty and teaching capability models.
//!
//! Faculty are owned by the catalog and only referenced by the scheduler.
//! A capability row says which session types a faculty member may teach
//! for one subject.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::SessionType;

/// A member of the teaching staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Faculty {
    /// Creates a new faculty member.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Faculty × subject × permitted session types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyCapability {
    pub faculty_id: String,
    pub subject_id: String,
    /// Session types this faculty member may teach for the subject.
    pub session_types: BTreeSet<SessionType>,
}

impl FacultyCapability {
    /// Creates a capability with no session types.
    pub fn new(faculty_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            subject_id: subject_id.into(),
            session_types: BTreeSet::new(),
        }
    }

    /// Adds a permitted session type.
    pub fn with_session(mut self, session_type: SessionType) -> Self {
        self.session_types.insert(session_type);
        self
    }

    /// Adds several permitted session types.
    pub fn with_sessions(mut self, session_types: impl IntoIterator<Item = SessionType>) -> Self {
        self.session_types.extend(session_types);
        self
    }

    /// Whether this row qualifies its faculty for `(subject_id, session_type)`.
    pub fn qualifies(&self, subject_id: &str, session_type: SessionType) -> bool {
        self.subject_id == subject_id && self.session_types.contains(&session_type)
    }
}
