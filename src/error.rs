//! Error types.
//!
//! Three things abort a generation run: the catalog could not be read, the
//! loaded catalog was inconsistent, or the new entries could not be
//! committed.
//! Missing faculty, rooms, or free slots reduce coverage and are reported
//! through [`CoverageReport`](crate::scheduler::CoverageReport) instead.

use crate::validation::ValidationError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Requested record does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Invalid scheduler configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of a generation run.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// A catalog read failed. Nothing was modified.
    #[error("failed to load {what} for section '{section_id}': {source}")]
    InputLoad {
        section_id: String,
        what: &'static str,
        #[source]
        source: StoreError,
    },

    /// The loaded catalog is inconsistent. Nothing was modified.
    ///
    /// The check covers every other section's entries too, so one malformed
    /// entry anywhere (inverted interval, bad batch tag) blocks generation
    /// for every section until it is repaired.
    #[error("invalid catalog data for section '{section_id}': {} problem(s)", .errors.len())]
    InvalidInput {
        section_id: String,
        errors: Vec<ValidationError>,
    },

    /// Committing the new entries failed.
    ///
    /// When `schedule_cleared` is set, the old entries were already deleted
    /// and the section now has no timetable until generation is retried.
    /// A failed delete is reported with `schedule_cleared = false`, which
    /// relies on [`TimetableWriter::delete_section_entries`] being
    /// all-or-nothing.
    ///
    /// [`TimetableWriter::delete_section_entries`]: crate::catalog::TimetableWriter::delete_section_entries
    #[error("failed to commit timetable for section '{section_id}' (schedule cleared: {schedule_cleared}): {source}")]
    Write {
        section_id: String,
        schedule_cleared: bool,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TimetableError {
    /// Whether the section was left without a timetable and must be regenerated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TimetableError::Write {
                schedule_cleared: true,
                ..
            }
        )
    }

    /// Section the failed run targeted, if any.
    pub fn section_id(&self) -> Option<&str> {
        match self {
            TimetableError::InputLoad { section_id, .. }
            | TimetableError::InvalidInput { section_id, .. }
            | TimetableError::Write { section_id, .. } => Some(section_id),
            TimetableError::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let e = StoreError::not_found("section", "S9");
        assert_eq!(e.to_string(), "section 'S9' not found");
    }

    #[test]
    fn test_input_load_display_and_source() {
        let e = TimetableError::InputLoad {
            section_id: "S1".into(),
            what: "subjects",
            source: StoreError::Unavailable("connection refused".into()),
        };
        assert!(e.to_string().contains("failed to load subjects"));
        assert!(std::error::Error::source(&e).is_some());
        assert!(!e.is_retryable());
        assert_eq!(e.section_id(), Some("S1"));
    }

    #[test]
    fn test_write_retryable_only_when_cleared() {
        let cleared = TimetableError::Write {
            section_id: "S1".into(),
            schedule_cleared: true,
            source: StoreError::Backend("insert failed".into()),
        };
        let kept = TimetableError::Write {
            section_id: "S1".into(),
            schedule_cleared: false,
            source: StoreError::Backend("delete failed".into()),
        };
        assert!(cleared.is_retryable());
        assert!(!kept.is_retryable());
    }
}
