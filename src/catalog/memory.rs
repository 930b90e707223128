//! In-memory catalog.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{CatalogReader, TimetableWriter};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    Classroom, Faculty, FacultyCapability, Section, SessionType, Subject, TimetableEntry,
};

/// Plain catalog tables; the JSON import/export format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub faculty: Vec<Faculty>,
    pub subjects: Vec<Subject>,
    pub capabilities: Vec<FacultyCapability>,
    pub classrooms: Vec<Classroom>,
    pub sections: Vec<Section>,
    pub entries: Vec<TimetableEntry>,
}

/// Catalog held in memory behind a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    data: RwLock<CatalogData>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing tables.
    pub fn from_data(data: CatalogData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Parses tables from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_data(serde_json::from_str(json)?))
    }

    /// Adds a faculty member.
    pub fn with_faculty(self, faculty: Faculty) -> Self {
        self.data.write().faculty.push(faculty);
        self
    }

    /// Adds a subject.
    pub fn with_subject(self, subject: Subject) -> Self {
        self.data.write().subjects.push(subject);
        self
    }

    /// Adds a capability row.
    pub fn with_capability(self, capability: FacultyCapability) -> Self {
        self.data.write().capabilities.push(capability);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(self, classroom: Classroom) -> Self {
        self.data.write().classrooms.push(classroom);
        self
    }

    /// Adds a section.
    pub fn with_section(self, section: Section) -> Self {
        self.data.write().sections.push(section);
        self
    }

    /// Adds an existing timetable entry.
    pub fn with_entry(self, entry: TimetableEntry) -> Self {
        self.data.write().entries.push(entry);
        self
    }

    /// Current entries of one section.
    pub fn entries_for_section(&self, section_id: &str) -> Vec<TimetableEntry> {
        self.data
            .read()
            .entries
            .iter()
            .filter(|e| e.section_id == section_id)
            .cloned()
            .collect()
    }

    /// Every stored entry.
    pub fn all_entries(&self) -> Vec<TimetableEntry> {
        self.data.read().entries.clone()
    }

    /// Every stored classroom.
    pub fn classrooms(&self) -> Vec<Classroom> {
        self.data.read().classrooms.clone()
    }

    /// Copy of all tables.
    pub fn to_data(&self) -> CatalogData {
        self.data.read().clone()
    }
}

impl CatalogReader for InMemoryCatalog {
    fn section(&self, section_id: &str) -> StoreResult<Section> {
        self.data
            .read()
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("section", section_id))
    }

    fn subjects_for_year(&self, year: u8) -> StoreResult<Vec<Subject>> {
        Ok(self
            .data
            .read()
            .subjects
            .iter()
            .filter(|s| s.year == year)
            .cloned()
            .collect())
    }

    fn capabilities(&self) -> StoreResult<Vec<FacultyCapability>> {
        Ok(self.data.read().capabilities.clone())
    }

    fn classrooms_by_type(&self, room_type: SessionType) -> StoreResult<Vec<Classroom>> {
        Ok(self
            .data
            .read()
            .classrooms
            .iter()
            .filter(|c| c.room_type == room_type)
            .cloned()
            .collect())
    }

    fn entries_excluding_section(&self, section_id: &str) -> StoreResult<Vec<TimetableEntry>> {
        Ok(self
            .data
            .read()
            .entries
            .iter()
            .filter(|e| e.section_id != section_id)
            .cloned()
            .collect())
    }
}

impl TimetableWriter for InMemoryCatalog {
    fn delete_section_entries(&self, section_id: &str) -> StoreResult<usize> {
        let mut data = self.data.write();
        let before = data.entries.len();
        data.entries.retain(|e| e.section_id != section_id);
        Ok(before - data.entries.len())
    }

    fn insert_entries(&self, entries: &[TimetableEntry]) -> StoreResult<()> {
        self.data.write().entries.extend_from_slice(entries);
        Ok(())
    }
}
