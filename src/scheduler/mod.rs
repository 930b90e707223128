//! Timetable synthesis and coverage reporting.
//!
//! # Algorithm
//!
//! `TimetableEngine` is a greedy two-phase allocator: lectures first, then
//! per-batch labs and tutorials. Faculty are chosen least-loaded first,
//! rooms round-robin, days and start slots in seeded random order. It is
//! not optimal and may under-schedule when capacity runs out.
//!
//! # Coverage
//!
//! `CoverageReport` records scheduled versus targeted sessions per subject
//! and session type, with the reason for every shortfall.

mod coverage;
mod engine;

pub use coverage::{CoverageLine, CoverageReport, ShortfallReason};
pub use engine::{least_loaded, GeneratedTimetable, TimetableEngine};
