//! Classroom model.
//!
//! A classroom hosts sessions of exactly one type: lecture halls take
//! lectures, labs take labs, tutorial rooms take tutorials.

use serde::{Deserialize, Serialize};

use super::SessionType;

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Session type this room may host.
    pub room_type: SessionType,
    /// Seats.
    pub capacity: u32,
}

impl Classroom {
    /// Creates a classroom with zero capacity.
    pub fn new(id: impl Into<String>, room_type: SessionType) -> Self {
        Self {
            id: id.into(),
            room_type,
            capacity: 0,
        }
    }

    /// Creates a lecture hall.
    pub fn lecture(id: impl Into<String>) -> Self {
        Self::new(id, SessionType::Lecture)
    }

    /// Creates a lab room.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, SessionType::Lab)
    }

    /// Creates a tutorial room.
    pub fn tutorial(id: impl Into<String>) -> Self {
        Self::new(id, SessionType::Tutorial)
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether a session of the given type may be held here.
    #[inline]
    pub fn can_host(&self, session_type: SessionType) -> bool {
        self.room_type == session_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_constructors() {
        assert_eq!(Classroom::lecture("L1").room_type, SessionType::Lecture);
        assert_eq!(Classroom::lab("B1").room_type, SessionType::Lab);
        assert_eq!(Classroom::tutorial("T1").room_type, SessionType::Tutorial);
        assert_eq!(Classroom::lecture("L1").with_capacity(60).capacity, 60);
    }

    #[test]
    fn test_can_host_only_own_type() {
        let lab = Classroom::lab("B1");
        assert!(lab.can_host(SessionType::Lab));
        assert!(!lab.can_host(SessionType::Lecture));
        assert!(!lab.can_host(SessionType::Tutorial));
    }
}
