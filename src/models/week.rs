//! Weekly slot grid and slot intervals.
//!
//! # Time Model
//! A teaching day is divided into `slots_per_day` one-hour slots, numbered
//! from 0. One designated `break_slot` is excluded from all scheduling.
//! Intervals are half-open: `[start, end)`.
//!
//! The same grid repeats for every weekday; there is no term-varying pattern.

use serde::{Deserialize, Serialize};

/// A slot interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRange {
    /// First slot (inclusive).
    pub start: u32,
    /// Last slot (exclusive).
    pub end: u32,
}

impl SlotRange {
    /// Creates a new slot range.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a range from a start slot and a duration.
    pub fn starting_at(start: u32, duration: u32) -> Self {
        Self::new(start, start.saturating_add(duration))
    }

    /// Number of slots covered.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a slot falls within this range.
    #[inline]
    pub fn contains(&self, slot: u32) -> bool {
        slot >= self.start && slot < self.end
    }

    /// Whether two ranges share at least one slot.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Iterates over the covered slots.
    pub fn slots(&self) -> std::ops::Range<u32> {
        self.start..self.end
    }
}

/// Shape of the repeating teaching day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekGrid {
    /// Slots per day, break included.
    pub slots_per_day: u32,
    /// Slot index reserved for the institutional break.
    pub break_slot: u32,
    /// Clock hour at which slot 0 starts. Only used for labels.
    pub first_hour: u32,
}

impl Default for WeekGrid {
    /// 09:00-17:00 with the 13:00-14:00 hour as break.
    fn default() -> Self {
        Self {
            slots_per_day: 8,
            break_slot: 4,
            first_hour: 9,
        }
    }
}

impl WeekGrid {
    /// Creates a grid with the given day length and break slot.
    pub fn new(slots_per_day: u32, break_slot: u32) -> Self {
        Self {
            slots_per_day,
            break_slot,
            ..Self::default()
        }
    }

    /// Sets the clock hour of slot 0.
    pub fn with_first_hour(mut self, first_hour: u32) -> Self {
        self.first_hour = first_hour;
        self
    }

    /// Whether `[start, start + duration)` includes the break slot.
    #[inline]
    pub fn spans_break(&self, start: u32, duration: u32) -> bool {
        SlotRange::starting_at(start, duration).contains(self.break_slot)
    }

    /// Whether `[start, start + duration)` lies inside the day.
    #[inline]
    pub fn fits(&self, start: u32, duration: u32) -> bool {
        duration > 0 && start.saturating_add(duration) <= self.slots_per_day
    }

    /// Whether a session may be placed at `[start, start + duration)`.
    pub fn is_schedulable(&self, start: u32, duration: u32) -> bool {
        self.fits(start, duration) && !self.spans_break(start, duration)
    }

    /// All start slots at which a session of `duration` slots may be placed,
    /// in ascending order.
    pub fn candidate_starts(&self, duration: u32) -> Vec<u32> {
        (0..self.slots_per_day)
            .filter(|&s| self.is_schedulable(s, duration))
            .collect()
    }

    /// Clock label of a slot interval, e.g. `13:00-15:00` for a two-slot lab.
    pub fn slot_label(&self, slots: SlotRange) -> String {
        let from = self.first_hour.saturating_add(slots.start);
        let to = self.first_hour.saturating_add(slots.end);
        format!("{from:02}:00-{to:02}:00")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_basics() {
        let r = SlotRange::starting_at(2, 2);
        assert_eq!(r, SlotRange::new(2, 4));
        assert_eq!(r.len(), 2);
        assert!(r.contains(2));
        assert!(r.contains(3));
        assert!(!r.contains(4));
        assert!(!r.is_empty());
        assert_eq!(r.slots().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_range_overlap() {
        let a = SlotRange::new(0, 2);
        assert!(a.overlaps(&SlotRange::new(1, 3)));
        // Adjacent ranges do not overlap (half-open)
        assert!(!a.overlaps(&SlotRange::new(2, 3)));
        assert!(!SlotRange::new(5, 6).overlaps(&a));
    }

    #[test]
    fn test_default_grid() {
        let g = WeekGrid::default();
        assert_eq!(g.slots_per_day, 8);
        assert_eq!(g.break_slot, 4);
        assert_eq!(g.candidate_starts(1).len(), 7);
    }

    #[test]
    fn test_single_slot_candidates_skip_break() {
        let g = WeekGrid::new(8, 4);
        assert_eq!(g.candidate_starts(1), vec![0, 1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_double_slot_candidates_never_span_break() {
        let g = WeekGrid::new(8, 4);
        // 3 would cover [3,5) which includes 4; 7 would run off the day
        assert_eq!(g.candidate_starts(2), vec![0, 1, 2, 5, 6]);
        for s in g.candidate_starts(2) {
            assert!(!g.spans_break(s, 2));
        }
    }

    #[test]
    fn test_fits() {
        let g = WeekGrid::new(8, 4);
        assert!(g.fits(6, 2));
        assert!(!g.fits(7, 2));
        assert!(!g.fits(0, 0));
    }

    #[test]
    fn test_slot_label() {
        let g = WeekGrid::default();
        assert_eq!(g.slot_label(SlotRange::starting_at(0, 1)), "09:00-10:00");
        assert_eq!(g.slot_label(SlotRange::starting_at(4, 1)), "13:00-14:00");
        assert_eq!(g.slot_label(SlotRange::starting_at(5, 2)), "14:00-16:00");
        let early = WeekGrid::new(6, 2).with_first_hour(8);
        assert_eq!(early.slot_label(SlotRange::starting_at(1, 1)), "09:00-10:00");
    }

    #[test]
    fn test_slot_label_saturates_on_unvalidated_grid() {
        let odd = WeekGrid::default().with_first_hour(u32::MAX);
        let max = u32::MAX;
        assert_eq!(odd.slot_label(SlotRange::starting_at(3, 1)), format!("{max}:00-{max}:00"));
    }
}
