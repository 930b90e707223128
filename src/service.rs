//! Generation runs against a catalog store.
//!
//! A run reads a consistent snapshot of every other section's entries,
//! computes, then replaces the target section's entries. Two runs must never
//! interleave, or both could see a shared faculty member or room as free.
//! [`TimetableService`] therefore holds one institution-wide lock for the
//! whole read → compute → delete → insert sequence.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogReader, CatalogSnapshot, TimetableWriter};
use crate::config::SchedulerConfig;
use crate::error::TimetableError;
use crate::models::TimetableEntry;
use crate::scheduler::{CoverageReport, TimetableEngine};
use crate::validation::{audit_timetable, validate_snapshot};

/// Successful generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub section_id: String,
    /// Seed that produced this timetable.
    pub seed: u64,
    /// Entries now stored for the section.
    pub entries: Vec<TimetableEntry>,
    /// Entries of the previous timetable that were replaced.
    pub replaced: usize,
    /// Scheduled versus targeted sessions.
    pub coverage: CoverageReport,
}

/// Serializes generation runs over one store.
#[derive(Debug)]
pub struct TimetableService<S> {
    store: S,
    engine: TimetableEngine,
    generation_lock: Mutex<()>,
}

impl<S> TimetableService<S>
where
    S: CatalogReader + TimetableWriter,
{
    /// Creates a service with a validated configuration.
    pub fn new(store: S, config: SchedulerConfig) -> Result<Self, TimetableError> {
        config.validate()?;
        Ok(Self {
            store,
            engine: TimetableEngine::new(config),
            generation_lock: Mutex::new(()),
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        self.engine.config()
    }

    /// Generates with the configured default seed.
    pub fn generate(&self, section_id: &str) -> Result<GenerationOutcome, TimetableError> {
        self.generate_with_seed(section_id, self.config().seed)
    }

    /// Regenerates one section's weekly timetable.
    ///
    /// Inputs are fully loaded and validated before anything is deleted, so
    /// a read failure leaves the old timetable in place. A failure after the
    /// delete is reported with `schedule_cleared = true`.
    pub fn generate_with_seed(
        &self,
        section_id: &str,
        seed: u64,
    ) -> Result<GenerationOutcome, TimetableError> {
        let _guard = self.generation_lock.lock();
        let span = tracing::info_span!("generate_timetable", section_id, seed);
        let _enter = span.enter();

        let snapshot = CatalogSnapshot::load(&self.store, section_id)?;
        validate_snapshot(&snapshot).map_err(|errors| {
            tracing::error!(problems = errors.len(), "catalog validation failed");
            TimetableError::InvalidInput {
                section_id: section_id.to_string(),
                errors,
            }
        })?;

        let generated = self.engine.generate_with_seed(&snapshot, seed);

        let mut all = snapshot.existing_entries.clone();
        all.extend(generated.entries.iter().cloned());
        let violations = audit_timetable(&all, &snapshot.room_types(), &self.config().grid);
        for v in &violations {
            tracing::error!(
                violation = ?v.violation_type,
                entity_id = %v.entity_id,
                "{}",
                v.message
            );
        }

        let replaced = self
            .store
            .delete_section_entries(section_id)
            .map_err(|source| TimetableError::Write {
                section_id: section_id.to_string(),
                schedule_cleared: false,
                source,
            })?;

        if let Err(source) = self.store.insert_entries(&generated.entries) {
            tracing::error!(
                error = %source,
                "insert failed after delete; section has no timetable until regenerated"
            );
            return Err(TimetableError::Write {
                section_id: section_id.to_string(),
                schedule_cleared: true,
                source,
            });
        }

        for line in generated.coverage.shortfalls() {
            tracing::warn!(
                subject_id = %line.subject_id,
                session_type = %line.session_type,
                scheduled = line.scheduled,
                target = line.target,
                reason = ?line.reason,
                "under-coverage"
            );
        }
        tracing::info!(
            replaced,
            inserted = generated.entries.len(),
            complete = generated.coverage.is_complete(),
            coverage_rate = generated.coverage.coverage_rate(),
            "timetable committed"
        );

        Ok(GenerationOutcome {
            section_id: generated.section_id,
            seed,
            entries: generated.entries,
            replaced,
            coverage: generated.coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::error::{StoreError, StoreResult};
    use crate::models::{Classroom, FacultyCapability, Section, SessionType, Subject, Weekday};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_section(Section::new("S1", "FY-A", 1))
            .with_subject(Subject::new("m", "MATH101", 1).with_weekly_hours(2))
            .with_capability(FacultyCapability::new("F1", "m").with_session(SessionType::Lecture))
            .with_classroom(Classroom::lecture("L1"))
            .with_entry(TimetableEntry::lecture("S1", "m", "F9", "L1", Weekday::Friday, 7))
    }

    #[test]
    fn test_generate_replaces_section_entries() {
        let service = TimetableService::new(catalog(), SchedulerConfig::default()).unwrap();
        let outcome = service.generate("S1").unwrap();

        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.entries.len(), 2);
        let stored = service.store().entries_for_section("S1");
        assert_eq!(stored, outcome.entries);
        assert!(stored.iter().all(|e| e.faculty_id == "F1"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SchedulerConfig::new().with_grid(crate::models::WeekGrid::new(3, 5));
        assert!(matches!(
            TimetableService::new(catalog(), config),
            Err(TimetableError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_foreign_entry_does_not_stall_run() {
        let mut corrupt = TimetableEntry::lecture("S2", "x", "F7", "L7", Weekday::Monday, 0);
        corrupt.end_slot = u32::MAX;
        let service =
            TimetableService::new(catalog().with_entry(corrupt), SchedulerConfig::default()).unwrap();

        let started = std::time::Instant::now();
        let outcome = service.generate("S1").unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(outcome.entries.len(), 2);
    }

    #[test]
    fn test_malformed_foreign_entry_blocks_generation() {
        let mut inverted = TimetableEntry::lecture("S2", "x", "F7", "L7", Weekday::Monday, 3);
        inverted.end_slot = 1;
        let service =
            TimetableService::new(catalog().with_entry(inverted), SchedulerConfig::default()).unwrap();

        let err = service.generate("S1").unwrap_err();
        assert!(matches!(err, TimetableError::InvalidInput { .. }));
        assert!(!err.is_retryable());
        // Old timetable untouched
        assert_eq!(service.store().entries_for_section("S1").len(), 1);
    }

    /// Store that can fail individual operations.
    struct FlakyStore {
        inner: InMemoryCatalog,
        fail_capabilities: bool,
        fail_delete: bool,
        fail_insert: bool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: catalog(),
                fail_capabilities: false,
                fail_delete: false,
                fail_insert: false,
            }
        }
    }

    impl CatalogReader for FlakyStore {
        fn section(&self, id: &str) -> StoreResult<Section> {
            self.inner.section(id)
        }
        fn subjects_for_year(&self, year: u8) -> StoreResult<Vec<Subject>> {
            self.inner.subjects_for_year(year)
        }
        fn capabilities(&self) -> StoreResult<Vec<FacultyCapability>> {
            if self.fail_capabilities {
                return Err(StoreError::Unavailable("timeout".into()));
            }
            self.inner.capabilities()
        }
        fn classrooms_by_type(&self, t: SessionType) -> StoreResult<Vec<Classroom>> {
            self.inner.classrooms_by_type(t)
        }
        fn entries_excluding_section(&self, id: &str) -> StoreResult<Vec<TimetableEntry>> {
            self.inner.entries_excluding_section(id)
        }
    }

    impl TimetableWriter for FlakyStore {
        fn delete_section_entries(&self, id: &str) -> StoreResult<usize> {
            if self.fail_delete {
                return Err(StoreError::Backend("delete rejected".into()));
            }
            self.inner.delete_section_entries(id)
        }
        fn insert_entries(&self, entries: &[TimetableEntry]) -> StoreResult<()> {
            if self.fail_insert {
                return Err(StoreError::Backend("insert rejected".into()));
            }
            self.inner.insert_entries(entries)
        }
    }

    #[test]
    fn test_read_failure_leaves_schedule_untouched() {
        let mut store = FlakyStore::new();
        store.fail_capabilities = true;
        let service = TimetableService::new(store, SchedulerConfig::default()).unwrap();

        let err = service.generate("S1").unwrap_err();
        assert!(matches!(err, TimetableError::InputLoad { what: "capabilities", .. }));
        assert_eq!(service.store().inner.entries_for_section("S1").len(), 1);
    }

    #[test]
    fn test_delete_failure_is_not_retry_state() {
        let mut store = FlakyStore::new();
        store.fail_delete = true;
        let service = TimetableService::new(store, SchedulerConfig::default()).unwrap();

        let err = service.generate("S1").unwrap_err();
        assert!(!err.is_retryable());
        assert_eq!(service.store().inner.entries_for_section("S1").len(), 1);
    }

    #[test]
    fn test_insert_failure_reports_cleared_schedule() {
        let mut store = FlakyStore::new();
        store.fail_insert = true;
        let service = TimetableService::new(store, SchedulerConfig::default()).unwrap();

        let err = service.generate("S1").unwrap_err();
        assert!(err.is_retryable());
        assert!(service.store().inner.entries_for_section("S1").is_empty());
    }
}
