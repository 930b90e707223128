//! Weekly academic timetable synthesis.
//!
//! Given one student section, produces a conflict-free weekly timetable:
//! subjects assigned to (day, slot, faculty, classroom, batch) tuples that
//! meet weekly lecture quotas, split practicals across three batches, avoid
//! the institutional break, and never double-book a faculty member or room
//! across *any* section.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Faculty`, `Subject`, `Classroom`,
//!   `Section`, `Batch`, `TimetableEntry`, `WeekGrid`
//! - **`grid`**: Availability grid, the per-day/per-slot busy index
//! - **`scheduler`**: Two-phase engine and coverage report
//! - **`catalog`**: Read/write contracts with the catalog store, in-memory store
//! - **`service`**: Serialized generation runs (lock → read → compute → commit)
//! - **`validation`**: Input integrity checks and invariant audit
//! - **`config`**: TOML-loadable scheduler settings
//!
//! # Example
//!
//! ```
//! use u_timetable::catalog::InMemoryCatalog;
//! use u_timetable::config::SchedulerConfig;
//! use u_timetable::models::{Classroom, FacultyCapability, Section, SessionType, Subject};
//! use u_timetable::service::TimetableService;
//!
//! let store = InMemoryCatalog::new()
//!     .with_section(Section::new("S1", "FY-A", 1))
//!     .with_subject(Subject::new("m", "MATH101", 1).with_weekly_hours(4))
//!     .with_capability(FacultyCapability::new("F1", "m").with_session(SessionType::Lecture))
//!     .with_classroom(Classroom::lecture("L1"));
//!
//! let service = TimetableService::new(store, SchedulerConfig::default()).unwrap();
//! let outcome = service.generate_with_seed("S1", 42).unwrap();
//! assert_eq!(outcome.entries.len(), 4);
//! assert!(outcome.coverage.is_complete());
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod scheduler;
pub mod service;
pub mod validation;

pub use error::{ConfigError, StoreError, TimetableError};
