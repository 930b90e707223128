//! Session types and weekdays.
//!
//! A session type decides both how many slots a session occupies and which
//! kind of classroom may host it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// Whole-section lecture (1 slot).
    Lecture,
    /// Per-batch practical (2 consecutive slots).
    Lab,
    /// Per-batch tutorial (1 slot).
    Tutorial,
}

impl SessionType {
    /// All session types in phase order.
    pub const ALL: [SessionType; 3] = [SessionType::Lecture, SessionType::Lab, SessionType::Tutorial];

    /// Number of consecutive slots a session of this type occupies.
    #[inline]
    pub fn duration_slots(self) -> u32 {
        match self {
            SessionType::Lab => 2,
            SessionType::Lecture | SessionType::Tutorial => 1,
        }
    }

    /// Whether sessions of this type are taught per batch.
    #[inline]
    pub fn is_batched(self) -> bool {
        !matches!(self, SessionType::Lecture)
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Lecture => "lecture",
            SessionType::Lab => "lab",
            SessionType::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Teaching day of the weekly template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// Monday through Friday.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Zero-based position in the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
