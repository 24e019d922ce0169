//! Appointment scheduling sub-state
//!
//! Date, time slot, recurrence and waitlist chosen on the scheduling step.
//! Every setter returns whether the state changed; rejected input leaves the
//! schedule untouched.
//!
//! # Rules
//!
//! - A date must not be before today and must not be blocked. Clearing it is
//!   always accepted.
//! - A time slot needs a date and must be one of the configured slots.
//!   Choosing the selected slot again clears it.
//! - Recurrence and waitlist can only be switched on once both date and time
//!   are set, and `normalize` switches them off again when either goes away.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::SchedulingConfig;
use crate::types::RecurrenceFrequency;

/// Appointment choices made so far
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub recurrence: Option<RecurrenceFrequency>,
    pub waitlist: bool,
}

impl Schedule {
    /// Date and time are both chosen
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Select or clear the appointment date
    pub fn set_date(
        &mut self,
        date: Option<NaiveDate>,
        today: NaiveDate,
        config: &SchedulingConfig,
    ) -> bool {
        if let Some(date) = date {
            if date < today {
                tracing::debug!(%date, %today, "Ignoring date in the past");
                return false;
            }
            if config.is_blocked(date) {
                tracing::debug!(%date, "Ignoring blocked date");
                return false;
            }
        }
        if self.date == date {
            return false;
        }
        self.date = date;
        self.normalize();
        true
    }

    /// Select `time`, or clear it when it is already selected
    pub fn toggle_time(&mut self, time: NaiveTime, config: &SchedulingConfig) -> bool {
        if self.date.is_none() {
            tracing::debug!(%time, "Ignoring time slot without a date");
            return false;
        }
        if !config.is_slot(time) {
            tracing::debug!(%time, "Ignoring time outside the configured slots");
            return false;
        }
        self.time = if self.time == Some(time) { None } else { Some(time) };
        self.normalize();
        true
    }

    /// Set or clear the recurrence frequency
    pub fn set_recurrence(&mut self, frequency: Option<RecurrenceFrequency>) -> bool {
        if frequency.is_some() && !self.is_complete() {
            tracing::debug!("Ignoring recurrence before date and time are chosen");
            return false;
        }
        if self.recurrence == frequency {
            return false;
        }
        self.recurrence = frequency;
        true
    }

    /// Join or leave the waitlist for an earlier slot
    pub fn set_waitlist(&mut self, enabled: bool) -> bool {
        if enabled && !self.is_complete() {
            tracing::debug!("Ignoring waitlist before date and time are chosen");
            return false;
        }
        if self.waitlist == enabled {
            return false;
        }
        self.waitlist = enabled;
        true
    }

    /// Switch off recurrence and waitlist while date or time is missing.
    ///
    /// Returns whether anything changed. Idempotent.
    pub fn normalize(&mut self) -> bool {
        if self.is_complete() || (self.recurrence.is_none() && !self.waitlist) {
            return false;
        }
        self.recurrence = None;
        self.waitlist = false;
        true
    }
}
