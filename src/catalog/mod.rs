//! Catalog access.
//!
//! The relational catalog is an external collaborator, consumed only through
//! two narrow contracts:
//! - [`CatalogReader`]: everything a generation run reads.
//! - [`TimetableWriter`]: the delete-then-insert commit of one section.
//!
//! [`InMemoryCatalog`] implements both for tests, the CLI, and embedding.

mod memory;
mod snapshot;

pub use memory::{CatalogData, InMemoryCatalog};
pub use snapshot::CatalogSnapshot;

use crate::error::StoreResult;
use crate::models::{Classroom, FacultyCapability, Section, SessionType, Subject, TimetableEntry};

/// Read side of the catalog.
pub trait CatalogReader {
    /// Loads one section.
    fn section(&self, section_id: &str) -> StoreResult<Section>;

    /// Subjects taught to the given year level.
    fn subjects_for_year(&self, year: u8) -> StoreResult<Vec<Subject>>;

    /// Every faculty-subject capability row.
    fn capabilities(&self) -> StoreResult<Vec<FacultyCapability>>;

    /// Classrooms of one room type.
    fn classrooms_by_type(&self, room_type: SessionType) -> StoreResult<Vec<Classroom>>;

    /// Every timetable entry whose section differs from `section_id`.
    fn entries_excluding_section(&self, section_id: &str) -> StoreResult<Vec<TimetableEntry>>;
}

/// Write side of the catalog.
pub trait TimetableWriter {
    /// Deletes every entry of a section. Returns the number removed.
    ///
    /// Must be all-or-nothing: on `Err`, every entry of the section is still
    /// stored. Callers report a failed delete as leaving the old timetable
    /// intact.
    fn delete_section_entries(&self, section_id: &str) -> StoreResult<usize>;

    /// Inserts new entries.
    fn insert_entries(&self, entries: &[TimetableEntry]) -> StoreResult<()>;
}
