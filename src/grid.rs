//! Availability grid.
//!
//! Per (weekday, slot) index of which faculty members, rooms, and student
//! cohorts are already committed. A run seeds one grid from every other
//! section's entries, then checks and reserves against it as it commits.
//!
//! # Layout
//! Cells are stored row-major: `day * slots_per_day + slot`. Each cell
//! keeps one busy set per [`ResourceKind`].
//!
//! # Contract
//! [`AvailabilityGrid::reserve`] does not re-check conflicts; callers must
//! test [`AvailabilityGrid::is_free`] first.

use std::collections::HashSet;

use crate::models::{cohort_key, SlotRange, TimetableEntry, WeekGrid, Weekday};

/// Kind of bookable identity tracked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Faculty member, by faculty id.
    Faculty,
    /// Classroom, by classroom id.
    Room,
    /// Student cohort, by [`cohort_key`].
    Cohort,
}

#[derive(Debug, Clone, Default)]
struct Cell {
    faculty: HashSet<String>,
    rooms: HashSet<String>,
    cohorts: HashSet<String>,
}

impl Cell {
    fn busy(&self, kind: ResourceKind) -> &HashSet<String> {
        match kind {
            ResourceKind::Faculty => &self.faculty,
            ResourceKind::Room => &self.rooms,
            ResourceKind::Cohort => &self.cohorts,
        }
    }

    fn busy_mut(&mut self, kind: ResourceKind) -> &mut HashSet<String> {
        match kind {
            ResourceKind::Faculty => &mut self.faculty,
            ResourceKind::Room => &mut self.rooms,
            ResourceKind::Cohort => &mut self.cohorts,
        }
    }
}

/// Busy-set index over the weekly grid.
#[derive(Debug, Clone)]
pub struct AvailabilityGrid {
    week: WeekGrid,
    cells: Vec<Cell>,
}

impl AvailabilityGrid {
    /// Creates an empty grid (everything free except the break).
    pub fn new(week: WeekGrid) -> Self {
        let len = Weekday::ALL.len() * week.slots_per_day as usize;
        Self {
            week,
            cells: vec![Cell::default(); len],
        }
    }

    /// Creates a grid seeded with every entry not belonging to `target_section`.
    pub fn seeded<'a>(
        week: WeekGrid,
        entries: impl IntoIterator<Item = &'a TimetableEntry>,
        target_section: &str,
    ) -> Self {
        let mut grid = Self::new(week);
        grid.seed(entries, target_section);
        grid
    }

    /// Marks the faculty, room, and cohort of every entry outside
    /// `target_section` as busy. Returns the number of entries applied.
    ///
    /// The target section's own entries are skipped: they are about to be
    /// replaced and must not block the new timetable.
    pub fn seed<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a TimetableEntry>,
        target_section: &str,
    ) -> usize {
        let mut applied = 0;
        for entry in entries {
            if entry.section_id == target_section {
                continue;
            }
            if !self.week.fits(entry.start_slot, entry.duration_slots()) {
                tracing::warn!(
                    section_id = %entry.section_id,
                    subject_id = %entry.subject_id,
                    start_slot = entry.start_slot,
                    end_slot = entry.end_slot,
                    "existing entry lies partly outside the grid; clipping"
                );
            }
            self.occupy(entry);
            applied += 1;
        }
        applied
    }

    /// The grid shape.
    pub fn week(&self) -> &WeekGrid {
        &self.week
    }

    /// Whether `id` is free for `[start, start + duration)` on `day`.
    ///
    /// Always `false` when the interval leaves the day or includes the
    /// break slot.
    pub fn is_free(
        &self,
        kind: ResourceKind,
        id: &str,
        day: Weekday,
        start: u32,
        duration: u32,
    ) -> bool {
        if !self.week.is_schedulable(start, duration) {
            return false;
        }
        SlotRange::starting_at(start, duration)
            .slots()
            .all(|slot| !self.is_busy(kind, id, day, slot))
    }

    /// Whether `id` is marked busy at one slot.
    pub fn is_busy(&self, kind: ResourceKind, id: &str, day: Weekday, slot: u32) -> bool {
        self.index(day, slot)
            .map(|i| self.cells[i].busy(kind).contains(id))
            .unwrap_or(false)
    }

    /// Commits a faculty member and a room for `[start, start + duration)`.
    pub fn reserve(&mut self, faculty_id: &str, room_id: &str, day: Weekday, start: u32, duration: u32) {
        self.mark(ResourceKind::Faculty, faculty_id, day, start, duration);
        self.mark(ResourceKind::Room, room_id, day, start, duration);
    }

    /// Marks one identity busy. Slots outside the day are ignored.
    pub fn mark(&mut self, kind: ResourceKind, id: &str, day: Weekday, start: u32, duration: u32) {
        let range = SlotRange::starting_at(start, duration);
        // Clamp to the day so a corrupt interval costs at most one day of cells
        let end = range.end.min(self.week.slots_per_day);
        for slot in range.start..end {
            if let Some(i) = self.index(day, slot) {
                self.cells[i].busy_mut(kind).insert(id.to_string());
            }
        }
    }

    /// Marks everything an existing entry holds: faculty, room, and cohort.
    pub fn occupy(&mut self, entry: &TimetableEntry) {
        let duration = entry.duration_slots();
        self.reserve(
            &entry.faculty_id,
            &entry.classroom_id,
            entry.day,
            entry.start_slot,
            duration,
        );
        let cohort = cohort_key(&entry.section_id, entry.batch_number);
        self.mark(ResourceKind::Cohort, &cohort, entry.day, entry.start_slot, duration);
    }

    fn index(&self, day: Weekday, slot: u32) -> Option<usize> {
        (slot < self.week.slots_per_day)
            .then(|| day.index() * self.week.slots_per_day as usize + slot as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionType;

    fn grid() -> AvailabilityGrid {
        AvailabilityGrid::new(WeekGrid::new(8, 4))
    }

    #[test]
    fn test_empty_grid_is_free_except_break() {
        let g = grid();
        assert!(g.is_free(ResourceKind::Faculty, "F1", Weekday::Monday, 0, 1));
        assert!(g.is_free(ResourceKind::Room, "L1", Weekday::Friday, 7, 1));
        assert!(!g.is_free(ResourceKind::Faculty, "F1", Weekday::Monday, 4, 1));
        // Two-slot window spanning the break
        assert!(!g.is_free(ResourceKind::Room, "B1", Weekday::Monday, 3, 2));
        // Runs off the end of the day
        assert!(!g.is_free(ResourceKind::Room, "B1", Weekday::Monday, 7, 2));
    }

    #[test]
    fn test_reserve_blocks_both_identities() {
        let mut g = grid();
        g.reserve("F1", "L1", Weekday::Tuesday, 1, 2);

        for slot in [1, 2] {
            assert!(g.is_busy(ResourceKind::Faculty, "F1", Weekday::Tuesday, slot));
            assert!(g.is_busy(ResourceKind::Room, "L1", Weekday::Tuesday, slot));
        }
        assert!(!g.is_free(ResourceKind::Faculty, "F1", Weekday::Tuesday, 2, 1));
        assert!(!g.is_free(ResourceKind::Room, "L1", Weekday::Tuesday, 0, 2));
        // Adjacent slot and other days stay free
        assert!(g.is_free(ResourceKind::Faculty, "F1", Weekday::Tuesday, 3, 1));
        assert!(g.is_free(ResourceKind::Faculty, "F1", Weekday::Wednesday, 1, 2));
        // Kinds are independent namespaces
        assert!(g.is_free(ResourceKind::Room, "F1", Weekday::Tuesday, 1, 1));
    }

    #[test]
    fn test_seed_skips_target_section() {
        let entries = vec![
            TimetableEntry::lecture("S1", "MATH", "F1", "L1", Weekday::Monday, 0),
            TimetableEntry::lecture("S2", "PHY", "F2", "L2", Weekday::Monday, 0),
        ];
        let g = AvailabilityGrid::seeded(WeekGrid::new(8, 4), &entries, "S1");

        assert!(g.is_free(ResourceKind::Faculty, "F1", Weekday::Monday, 0, 1));
        assert!(g.is_free(ResourceKind::Room, "L1", Weekday::Monday, 0, 1));
        assert!(!g.is_free(ResourceKind::Faculty, "F2", Weekday::Monday, 0, 1));
        assert!(!g.is_free(ResourceKind::Room, "L2", Weekday::Monday, 0, 1));
        assert!(!g.is_free(ResourceKind::Cohort, "S2", Weekday::Monday, 0, 1));
    }

    #[test]
    fn test_seed_counts_applied() {
        let entries = vec![
            TimetableEntry::lecture("S1", "MATH", "F1", "L1", Weekday::Monday, 0),
            TimetableEntry::batched("S2", "PHY", "F2", "B1", Weekday::Monday, 1, SessionType::Lab, 3),
        ];
        let mut g = grid();
        assert_eq!(g.seed(&entries, "S1"), 1);
        assert!(g.is_busy(ResourceKind::Cohort, "S2#3", Weekday::Monday, 2));
        assert!(!g.is_busy(ResourceKind::Cohort, "S2", Weekday::Monday, 2));
    }

    #[test]
    fn test_out_of_range_marks_are_clipped() {
        let mut g = grid();
        g.mark(ResourceKind::Room, "L1", Weekday::Friday, 7, 3);
        assert!(g.is_busy(ResourceKind::Room, "L1", Weekday::Friday, 7));
        assert!(!g.is_busy(ResourceKind::Room, "L1", Weekday::Friday, 8));
        assert!(!g.is_busy(ResourceKind::Room, "L1", Weekday::Friday, 9));
    }

    #[test]
    fn test_seed_clamps_oversized_interval() {
        let mut corrupt = TimetableEntry::lecture("S2", "PHY", "F2", "L2", Weekday::Wednesday, 6);
        corrupt.end_slot = u32::MAX;
        let started = std::time::Instant::now();
        let g = AvailabilityGrid::seeded(WeekGrid::new(8, 4), &[corrupt], "S1");

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert!(g.is_busy(ResourceKind::Faculty, "F2", Weekday::Wednesday, 6));
        assert!(g.is_busy(ResourceKind::Room, "L2", Weekday::Wednesday, 7));
        assert!(!g.is_busy(ResourceKind::Room, "L2", Weekday::Wednesday, 5));
        assert!(!g.is_busy(ResourceKind::Room, "L2", Weekday::Thursday, 0));
    }
}
