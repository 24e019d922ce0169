//! Confirmation payload
//!
//! The structured output handed to notification collaborators when the user
//! moves forward from the terminal group. Only the sections the catalog's
//! capabilities enable are present.

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::logic::summary::{BookingSummary, SelectedService};
use crate::types::RecurrenceFrequency;

/// Who was assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignees {
    /// Category id -> specialist id
    PerCategory(IndexMap<String, String>),
    /// One specialist for the whole booking
    Single(String),
}

/// Appointment section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_label: Option<String>,
    pub waitlist_enabled: bool,
}

/// Contact section, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Emitted on the terminal forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPayload {
    pub services: Vec<SelectedService>,
    pub total_price: Decimal,
    pub total_duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Assignees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerDetails>,
}

impl ConfirmationPayload {
    /// Payload carrying only the summary
    pub fn from_summary(summary: BookingSummary) -> Self {
        Self {
            services: summary.services,
            total_price: summary.total_price,
            total_duration_minutes: summary.total_duration_minutes,
            assignees: None,
            appointment: None,
            customer: None,
        }
    }

    /// Specialist ids in assignment order
    pub fn assignee_ids(&self) -> Vec<&str> {
        match &self.assignees {
            Some(Assignees::PerCategory(map)) => map.values().map(String::as_str).collect(),
            Some(Assignees::Single(id)) => vec![id.as_str()],
            None => Vec::new(),
        }
    }
}

impl AppointmentDetails {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        recurrence: Option<RecurrenceFrequency>,
        waitlist_enabled: bool,
    ) -> Self {
        Self {
            date,
            time,
            recurrence,
            recurrence_label: recurrence.map(|r| r.label().to_string()),
            waitlist_enabled,
        }
    }
}
