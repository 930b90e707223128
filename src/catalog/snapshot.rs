//! Fully loaded inputs of one generation run.

use std::collections::BTreeMap;

use super::CatalogReader;
use crate::error::{StoreError, TimetableError};
use crate::models::{Classroom, FacultyCapability, Section, SessionType, Subject, TimetableEntry};

/// Everything a run needs, fetched before anything is written.
///
/// Collections are normalized on load: subjects by (code, id), classrooms
/// by id. Store iteration order therefore never affects the result.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Target section.
    pub section: Section,
    /// Subjects of the section's year level.
    pub subjects: Vec<Subject>,
    /// All capability rows.
    pub capabilities: Vec<FacultyCapability>,
    /// Classrooms keyed by room type.
    pub classrooms: BTreeMap<SessionType, Vec<Classroom>>,
    /// Entries of every other section.
    pub existing_entries: Vec<TimetableEntry>,
}

impl CatalogSnapshot {
    /// Reads all inputs for `section_id`.
    ///
    /// Any read failure aborts with [`TimetableError::InputLoad`].
    pub fn load<R: CatalogReader + ?Sized>(
        reader: &R,
        section_id: &str,
    ) -> Result<Self, TimetableError> {
        let input_err = |what: &'static str| {
            move |source: StoreError| TimetableError::InputLoad {
                section_id: section_id.to_string(),
                what,
                source,
            }
        };

        let section = reader.section(section_id).map_err(input_err("section"))?;
        let subjects = reader
            .subjects_for_year(section.year)
            .map_err(input_err("subjects"))?;
        let capabilities = reader.capabilities().map_err(input_err("capabilities"))?;

        let mut classrooms = BTreeMap::new();
        for room_type in SessionType::ALL {
            let rooms = reader
                .classrooms_by_type(room_type)
                .map_err(input_err("classrooms"))?;
            classrooms.insert(room_type, rooms);
        }

        let existing_entries = reader
            .entries_excluding_section(section_id)
            .map_err(input_err("existing entries"))?;

        Ok(Self::new(section, subjects, capabilities, classrooms, existing_entries))
    }

    /// Builds a snapshot from already loaded parts.
    pub fn new(
        section: Section,
        mut subjects: Vec<Subject>,
        capabilities: Vec<FacultyCapability>,
        mut classrooms: BTreeMap<SessionType, Vec<Classroom>>,
        existing_entries: Vec<TimetableEntry>,
    ) -> Self {
        subjects.sort_by(|a, b| (&a.code, &a.id).cmp(&(&b.code, &b.id)));
        for rooms in classrooms.values_mut() {
            rooms.sort_by(|a, b| a.id.cmp(&b.id));
        }
        Self {
            section,
            subjects,
            capabilities,
            classrooms,
            existing_entries,
        }
    }

    /// Classrooms that may host `session_type`, sorted by id.
    pub fn rooms_for(&self, session_type: SessionType) -> &[Classroom] {
        self.classrooms
            .get(&session_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Faculty qualified for `(subject_id, session_type)`, sorted and deduplicated.
    pub fn qualified_faculty(&self, subject_id: &str, session_type: SessionType) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .capabilities
            .iter()
            .filter(|c| c.qualifies(subject_id, session_type))
            .map(|c| c.faculty_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Room type of every known classroom.
    pub fn room_types(&self) -> BTreeMap<&str, SessionType> {
        self.classrooms
            .values()
            .flatten()
            .map(|r| (r.id.as_str(), r.room_type))
            .collect()
    }
}
