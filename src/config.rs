//! Scheduler configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```toml
//! seed = 42
//! check_cohort_clashes = true
//!
//! [grid]
//! slots_per_day = 8
//! break_slot = 4
//! first_hour = 9
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::models::WeekGrid;

/// Longest supported teaching day.
pub const MAX_SLOTS_PER_DAY: u32 = 24;

/// Settings for generation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Shape of the teaching day.
    pub grid: WeekGrid,
    /// Seed used when the caller does not supply one.
    pub seed: u64,
    /// Also keep a section's lectures and batch sessions from overlapping.
    pub check_cohort_clashes: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            grid: WeekGrid::default(),
            seed: 0,
            check_cohort_clashes: true,
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid.
    pub fn with_grid(mut self, grid: WeekGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the default seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables cohort clash checks.
    pub fn with_cohort_clash_check(mut self, enabled: bool) -> Self {
        self.check_cohort_clashes = enabled;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks grid bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.slots_per_day == 0 {
            return Err(ConfigError::Invalid("grid.slots_per_day must be positive".into()));
        }
        if g.slots_per_day > MAX_SLOTS_PER_DAY {
            return Err(ConfigError::Invalid(format!(
                "grid.slots_per_day must be at most {MAX_SLOTS_PER_DAY}, got {}",
                g.slots_per_day
            )));
        }
        if g.break_slot >= g.slots_per_day {
            return Err(ConfigError::Invalid(format!(
                "grid.break_slot {} is outside a {}-slot day",
                g.break_slot, g.slots_per_day
            )));
        }
        if g.first_hour >= 24 {
            return Err(ConfigError::Invalid(format!(
                "grid.first_hour must be below 24, got {}",
                g.first_hour
            )));
        }
        if g.first_hour.saturating_add(g.slots_per_day) > 24 {
            return Err(ConfigError::Invalid(format!(
                "a {}-slot day starting at {:02}:00 runs past midnight",
                g.slots_per_day, g.first_hour
            )));
        }
        Ok(())
    }
}
