//! Timetable (solution) model.
//!
//! A timetable is the set of weekly entries of one or more sections. Each
//! entry binds a subject session to a faculty member, a classroom, a day,
//! and a slot interval.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::{SessionType, SlotRange, WeekGrid, Weekday};

/// One weekly session of a section (or of one of its batches).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub section_id: String,
    pub subject_id: String,
    pub faculty_id: String,
    pub classroom_id: String,
    pub day: Weekday,
    /// First slot (inclusive).
    pub start_slot: u32,
    /// Last slot (exclusive).
    pub end_slot: u32,
    pub session_type: SessionType,
    /// `None` for lectures; 1..=3 for labs and tutorials.
    pub batch_number: Option<u8>,
}

impl TimetableEntry {
    /// Creates a whole-section lecture entry of one slot.
    pub fn lecture(
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        faculty_id: impl Into<String>,
        classroom_id: impl Into<String>,
        day: Weekday,
        start_slot: u32,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            faculty_id: faculty_id.into(),
            classroom_id: classroom_id.into(),
            day,
            start_slot,
            end_slot: start_slot + SessionType::Lecture.duration_slots(),
            session_type: SessionType::Lecture,
            batch_number: None,
        }
    }

    /// Creates a batch entry whose length follows the session type.
    #[allow(clippy::too_many_arguments)]
    pub fn batched(
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        faculty_id: impl Into<String>,
        classroom_id: impl Into<String>,
        day: Weekday,
        start_slot: u32,
        session_type: SessionType,
        batch_number: u8,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            faculty_id: faculty_id.into(),
            classroom_id: classroom_id.into(),
            day,
            start_slot,
            end_slot: start_slot + session_type.duration_slots(),
            session_type,
            batch_number: Some(batch_number),
        }
    }

    /// Occupied slot interval.
    #[inline]
    pub fn slots(&self) -> SlotRange {
        SlotRange::new(self.start_slot, self.end_slot)
    }

    /// Number of slots occupied.
    #[inline]
    pub fn duration_slots(&self) -> u32 {
        self.end_slot.saturating_sub(self.start_slot)
    }

    /// Whether both entries occupy overlapping slots on the same day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.slots().overlaps(&other.slots())
    }
}

/// A set of timetable entries, ordered for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub entries: Vec<TimetableEntry>,
}

impl Timetable {
    /// Wraps entries, sorted by (day, start slot, section, batch, subject).
    pub fn from_entries(entries: Vec<TimetableEntry>) -> Self {
        let mut timetable = Self { entries };
        timetable.sort();
        timetable
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one day, in display order.
    pub fn day_view(&self, day: Weekday) -> Vec<&TimetableEntry> {
        self.entries.iter().filter(|e| e.day == day).collect()
    }

    /// Sorts entries by (day, start slot, section, batch, subject).
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            (a.day, a.start_slot, &a.section_id, a.batch_number, &a.subject_id)
                .cmp(&(b.day, b.start_slot, &b.section_id, b.batch_number, &b.subject_id))
        });
    }

    /// Plain-text weekly listing with clock times, one line per session.
    ///
    /// Days without sessions are left out.
    pub fn render(&self, week: &WeekGrid) -> String {
        let mut out = String::new();
        for day in Weekday::ALL {
            let sessions = self.day_view(day);
            if sessions.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{day}");
            for e in sessions {
                let batch = e.batch_number.map(|n| format!(" (batch {n})")).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "  {}  {} {}{}  faculty {}  room {}",
                    week.slot_label(e.slots()),
                    e.subject_id,
                    e.session_type,
                    batch,
                    e.faculty_id,
                    e.classroom_id
                );
            }
        }
        out
    }
}
