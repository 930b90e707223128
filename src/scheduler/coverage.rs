//! Coverage report.
//!
//! Generation is best-effort: a subject may end up with fewer sessions than
//! it asks for when faculty, rooms, or free slots run out. Each shortfall is
//! recorded here instead of being raised as an error.
//!
//! | Line | Target |
//! |------|--------|
//! | Lecture | `weekly_hours` one-slot sessions |
//! | Lab | one two-slot session per batch |
//! | Tutorial | one one-slot session per batch |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{SessionType, Subject, TimetableEntry};

/// Why a coverage line fell short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallReason {
    /// Nobody may teach this subject for this session type.
    NoQualifiedFaculty,
    /// No classroom of the needed type exists.
    NoClassroom,
    /// Faculty and rooms exist, but no common free slot was left.
    NoFreeSlot,
}

/// Scheduled versus targeted sessions for one (subject, session type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLine {
    pub subject_id: String,
    pub subject_code: String,
    pub session_type: SessionType,
    /// Faculty member chosen for this line, if any qualified.
    pub faculty_id: Option<String>,
    /// Sessions wanted.
    pub target: u32,
    /// Sessions placed.
    pub scheduled: u32,
    pub reason: Option<ShortfallReason>,
    /// Batches left without a session (labs and tutorials only).
    pub unplaced_batches: Vec<u8>,
}

impl CoverageLine {
    /// Creates an empty line for a subject.
    pub fn new(subject: &Subject, session_type: SessionType, target: u32) -> Self {
        Self {
            subject_id: subject.id.clone(),
            subject_code: subject.code.clone(),
            session_type,
            faculty_id: None,
            target,
            scheduled: 0,
            reason: None,
            unplaced_batches: Vec::new(),
        }
    }

    /// Sessions still missing.
    #[inline]
    pub fn missing(&self) -> u32 {
        self.target.saturating_sub(self.scheduled)
    }

    /// Whether the target was reached.
    #[inline]
    pub fn is_met(&self) -> bool {
        self.scheduled >= self.target
    }
}

/// Result attribute of a generation run: what was and was not placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub lines: Vec<CoverageLine>,
    /// Slots assigned per faculty member during this run.
    pub faculty_hours: BTreeMap<String, u32>,
    /// Slots booked per classroom during this run.
    pub room_slots: BTreeMap<String, u32>,
}

impl CoverageReport {
    /// Builds a report from finished lines and the generated entries.
    pub fn new(lines: Vec<CoverageLine>, entries: &[TimetableEntry]) -> Self {
        let mut faculty_hours = BTreeMap::new();
        let mut room_slots = BTreeMap::new();
        for e in entries {
            *faculty_hours.entry(e.faculty_id.clone()).or_insert(0) += e.duration_slots();
            *room_slots.entry(e.classroom_id.clone()).or_insert(0) += e.duration_slots();
        }
        Self {
            lines,
            faculty_hours,
            room_slots,
        }
    }

    /// Sum of all targets.
    pub fn total_target(&self) -> u32 {
        self.lines.iter().map(|l| l.target).sum()
    }

    /// Sum of all placed sessions.
    pub fn total_scheduled(&self) -> u32 {
        self.lines.iter().map(|l| l.scheduled).sum()
    }

    /// Whether every line met its target.
    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(CoverageLine::is_met)
    }

    /// Lines that fell short.
    pub fn shortfalls(&self) -> Vec<&CoverageLine> {
        self.lines.iter().filter(|l| !l.is_met()).collect()
    }

    /// Line for one (subject, session type).
    pub fn line(&self, subject_id: &str, session_type: SessionType) -> Option<&CoverageLine> {
        self.lines
            .iter()
            .find(|l| l.subject_id == subject_id && l.session_type == session_type)
    }

    /// Fraction of targeted sessions that were placed (1.0 when nothing was targeted).
    pub fn coverage_rate(&self) -> f64 {
        let target = self.total_target();
        if target == 0 {
            1.0
        } else {
            self.total_scheduled() as f64 / target as f64
        }
    }
}
