//! Configuration management module
//!
//! Runtime settings that are not part of a catalog: currency used in price
//! labels, bookable time slots, blocked dates and the default log level.
//! File loading and validation live in `config_file`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Scheduling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Hour of the first bookable slot (0-23)
    pub first_slot_hour: u32,
    /// Hour of the last bookable slot (0-23, inclusive)
    pub last_slot_hour: u32,
    /// Dates that cannot be booked (fully booked, holidays)
    pub blocked_dates: Vec<NaiveDate>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            first_slot_hour: 10,
            last_slot_hour: 20,
            blocked_dates: Vec::new(),
        }
    }
}

impl SchedulingConfig {
    /// Hourly slots from `first_slot_hour` to `last_slot_hour`, inclusive.
    ///
    /// Out-of-range hours are skipped.
    pub fn time_slots(&self) -> Vec<NaiveTime> {
        (self.first_slot_hour..=self.last_slot_hour)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .collect()
    }

    pub fn is_slot(&self, time: NaiveTime) -> bool {
        self.time_slots().contains(&time)
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }
}

/// Top-level runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Currency code appended to price labels
    pub currency: String,
    pub scheduling: SchedulingConfig,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            currency: "RON".to_string(),
            scheduling: SchedulingConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl BookingConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }
}
