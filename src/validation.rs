//! Input validation and timetable auditing.
//!
//! - [`validate_snapshot`] checks the structural integrity of loaded
//!   catalog data before a run: duplicate IDs, rooms filed under the wrong
//!   type, subjects of another year level, malformed existing entries.
//! - [`audit_timetable`] checks a set of entries against every timetable
//!   invariant: no faculty or room double-booking, break exclusion,
//!   session durations, batch tagging, room types, and at most one lecture
//!   per (section, subject, day).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::catalog::CatalogSnapshot;
use crate::models::{is_valid_batch_number, SessionType, TimetableEntry, WeekGrid, Weekday};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A classroom was returned under a room type it does not have.
    RoomTypeMismatch,
    /// A subject belongs to a different year level than the section.
    YearMismatch,
    /// An existing entry has an empty or inverted slot interval.
    InvalidInterval,
    /// An existing entry's batch number does not fit its session type.
    InvalidBatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of a generation run.
///
/// Checks:
/// 1. No duplicate subject IDs
/// 2. No duplicate classroom IDs (across all room types)
/// 3. Every classroom is filed under its own room type
/// 4. Every subject matches the section's year level
/// 5. Existing entries have `end_slot > start_slot`
/// 6. Existing entries carry a batch number iff they are batched sessions
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &CatalogSnapshot) -> ValidationResult {
    let mut errors = Vec::new();

    let mut subject_ids = HashSet::new();
    for s in &snapshot.subjects {
        if !subject_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
        if s.year != snapshot.section.year {
            errors.push(ValidationError::new(
                ValidationErrorKind::YearMismatch,
                format!(
                    "Subject '{}' is year {} but section '{}' is year {}",
                    s.id, s.year, snapshot.section.id, snapshot.section.year
                ),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for (filed_as, rooms) in &snapshot.classrooms {
        for r in rooms {
            if !room_ids.insert(r.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate classroom ID: {}", r.id),
                ));
            }
            if !r.can_host(*filed_as) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RoomTypeMismatch,
                    format!(
                        "Classroom '{}' is a {} room but was listed as {}",
                        r.id, r.room_type, filed_as
                    ),
                ));
            }
        }
    }

    for e in &snapshot.existing_entries {
        if e.end_slot <= e.start_slot {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!(
                    "Entry of section '{}' subject '{}' has slots [{}, {})",
                    e.section_id, e.subject_id, e.start_slot, e.end_slot
                ),
            ));
        }
        if !batch_tag_ok(e) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBatch,
                format!(
                    "{} entry of section '{}' subject '{}' has batch {:?}",
                    e.session_type, e.section_id, e.subject_id, e.batch_number
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A timetable invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (faculty, classroom, section, or subject).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A faculty member teaches two overlapping sessions.
    FacultyDoubleBooked,
    /// A classroom hosts two overlapping sessions.
    RoomDoubleBooked,
    /// A session covers the break slot.
    BreakOverlap,
    /// A session's length does not match its type.
    InvalidDuration,
    /// Lecture with a batch, or lab/tutorial without a valid one.
    InvalidBatch,
    /// A session is held in a room of another type.
    RoomTypeMismatch,
    /// Two lectures of the same subject for one section on one day.
    DuplicateDailyLecture,
}

impl Violation {
    fn new(violation_type: ViolationType, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Audits entries against all timetable invariants.
///
/// `room_types` maps classroom IDs to their type; entries in rooms missing
/// from the map are not type-checked. Pass the entries of every section to
/// check double-booking institution-wide.
pub fn audit_timetable(
    entries: &[TimetableEntry],
    room_types: &BTreeMap<&str, SessionType>,
    week: &WeekGrid,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for e in entries {
        if e.slots().contains(week.break_slot) {
            violations.push(Violation::new(
                ViolationType::BreakOverlap,
                &e.section_id,
                format!(
                    "{} of '{}' on {} covers break slot {}",
                    e.session_type, e.subject_id, e.day, week.break_slot
                ),
            ));
        }
        if e.duration_slots() != e.session_type.duration_slots() {
            violations.push(Violation::new(
                ViolationType::InvalidDuration,
                &e.section_id,
                format!(
                    "{} of '{}' spans {} slot(s), expected {}",
                    e.session_type,
                    e.subject_id,
                    e.duration_slots(),
                    e.session_type.duration_slots()
                ),
            ));
        }
        if !batch_tag_ok(e) {
            violations.push(Violation::new(
                ViolationType::InvalidBatch,
                &e.section_id,
                format!("{} of '{}' has batch {:?}", e.session_type, e.subject_id, e.batch_number),
            ));
        }
        if let Some(&room_type) = room_types.get(e.classroom_id.as_str()) {
            if room_type != e.session_type {
                violations.push(Violation::new(
                    ViolationType::RoomTypeMismatch,
                    &e.classroom_id,
                    format!(
                        "{} of '{}' held in {} room '{}'",
                        e.session_type, e.subject_id, room_type, e.classroom_id
                    ),
                ));
            }
        }
    }

    find_overlaps(entries, |e| e.faculty_id.as_str(), ViolationType::FacultyDoubleBooked, &mut violations);
    find_overlaps(entries, |e| e.classroom_id.as_str(), ViolationType::RoomDoubleBooked, &mut violations);

    let mut daily_lectures: HashMap<(&str, &str, Weekday), usize> = HashMap::new();
    for e in entries.iter().filter(|e| e.session_type == SessionType::Lecture) {
        *daily_lectures
            .entry((e.section_id.as_str(), e.subject_id.as_str(), e.day))
            .or_insert(0) += 1;
    }
    let mut repeated: Vec<_> = daily_lectures.into_iter().filter(|(_, n)| *n > 1).collect();
    repeated.sort();
    for ((section_id, subject_id, day), n) in repeated {
        violations.push(Violation::new(
            ViolationType::DuplicateDailyLecture,
            section_id,
            format!("{n} lectures of '{subject_id}' on {day}"),
        ));
    }

    violations
}

fn batch_tag_ok(e: &TimetableEntry) -> bool {
    match (e.session_type.is_batched(), e.batch_number) {
        (false, None) => true,
        (true, Some(n)) => is_valid_batch_number(n),
        _ => false,
    }
}

/// Pairwise overlap check within each (key, day) group.
fn find_overlaps<'a>(
    entries: &'a [TimetableEntry],
    key: impl Fn(&'a TimetableEntry) -> &'a str,
    violation_type: ViolationType,
    out: &mut Vec<Violation>,
) {
    let mut groups: BTreeMap<(&str, Weekday), Vec<&TimetableEntry>> = BTreeMap::new();
    for e in entries {
        groups.entry((key(e), e.day)).or_default().push(e);
    }
    for ((id, day), group) in groups {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.slots().overlaps(&b.slots()) {
                    out.push(Violation::new(
                        violation_type,
                        id,
                        format!(
                            "'{}' booked twice on {}: section '{}' [{}, {}) and section '{}' [{}, {})",
                            id,
                            day,
                            a.section_id,
                            a.start_slot,
                            a.end_slot,
                            b.section_id,
                            b.start_slot,
                            b.end_slot
                        ),
                    ));
                }
            }
        }
    }
}
