//! Timetabling domain models.
//!
//! Catalog records (faculty, subjects, classrooms, sections) are read-only
//! inputs to a generation run. Timetable entries are its output.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | Subject session | Activity |
//! | Faculty | Human resource |
//! | Classroom | Primary resource |
//! | Section / Batch | Task owner |
//! | TimetableEntry | Assignment |

mod batch;
mod classroom;
mod faculty;
mod schedule;
mod section;
mod session;
mod subject;
mod week;

pub use batch::{cohort_key, is_valid_batch_number, split_batches, Batch, BATCH_COUNT};
pub use classroom::Classroom;
pub use faculty::{Faculty, FacultyCapability};
pub use schedule::{Timetable, TimetableEntry};
pub use section::Section;
pub use session::{SessionType, Weekday};
pub use subject::Subject;
pub use week::{SlotRange, WeekGrid};
