//! Batch splitting.
//!
//! Every section is divided into [`BATCH_COUNT`] symbolic batches for labs
//! and tutorials. Batches are labels only; their sizes are not derived from
//! the section's student count and are not persisted on their own.

use serde::{Deserialize, Serialize};

use super::Section;

/// Fixed number of batches per section.
pub const BATCH_COUNT: u8 = 3;

/// One of a section's sub-groups for practical sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Owning section.
    pub section_id: String,
    /// Batch number, 1 through [`BATCH_COUNT`].
    pub number: u8,
    /// `<section name><number>`, e.g. `FY-A2`.
    pub name: String,
}

impl Batch {
    /// Grid key under which this batch's sessions are booked.
    pub fn cohort_key(&self) -> String {
        cohort_key(&self.section_id, Some(self.number))
    }
}

/// Derives the batches of a section.
///
/// # Example
///
/// ```
/// use u_timetable::models::{split_batches, Section};
///
/// let batches = split_batches(&Section::new("s1", "FY-A", 1));
/// let names: Vec<_> = batches.iter().map(|b| b.name.as_str()).collect();
/// assert_eq!(names, ["FY-A1", "FY-A2", "FY-A3"]);
/// ```
pub fn split_batches(section: &Section) -> Vec<Batch> {
    (1..=BATCH_COUNT)
        .map(|number| Batch {
            section_id: section.id.clone(),
            number,
            name: format!("{}{}", section.name, number),
        })
        .collect()
}

/// Whether `number` names one of a section's batches.
#[inline]
pub fn is_valid_batch_number(number: u8) -> bool {
    (1..=BATCH_COUNT).contains(&number)
}

/// Grid key for a student cohort.
///
/// `None` is the whole section (lectures); `Some(n)` is batch `n`.
pub fn cohort_key(section_id: &str, batch_number: Option<u8>) -> String {
    match batch_number {
        None => section_id.to_string(),
        Some(n) => format!("{section_id}#{n}"),
    }
}
