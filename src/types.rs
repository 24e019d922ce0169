//! Type-safe value types for the booking flow
//!
//! Small closed sets (selection modes, special steps, recurrence frequencies,
//! message kinds) are Rust enums rather than strings so that catalogs, events
//! and payloads get validated at parse time and matched exhaustively.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// How many options of a step may be selected at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectionMode {
    /// At most one option; selecting another replaces the previous one
    #[default]
    Single,
    /// Any number of options, toggled independently
    Multi,
}

impl SelectionMode {
    /// Whether `count` selected options satisfy this mode
    pub fn is_satisfied_by(self, count: usize) -> bool {
        match self {
            Self::Single => count == 1,
            Self::Multi => count > 0,
        }
    }
}

/// How secondary assignments (specialists) are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentMode {
    /// One assignee per category implied by the selected leaves
    PerCategory,
    /// One assignee for the whole booking
    Single,
}

/// Synthetic steps appended after the catalog steps are exhausted.
///
/// Variant order is presentation order: assignment, then scheduling, then
/// contact details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SpecialStep {
    Assignment,
    Scheduling,
    Contact,
}

impl SpecialStep {
    /// Sentinel step identity used in navigation groups
    pub const fn step_id(self) -> &'static str {
        match self {
            Self::Assignment => "specialist-selection",
            Self::Scheduling => "appointment-scheduling",
            Self::Contact => "customer-details",
        }
    }

    /// Map a step identity back to its special step, if it is a sentinel
    pub fn from_step_id(step_id: &str) -> Option<Self> {
        Self::iter().find(|special| special.step_id() == step_id)
    }

    /// Human-readable title for presentation layers
    pub const fn title(self) -> &'static str {
        match self {
            Self::Assignment => "Choose your specialist",
            Self::Scheduling => "Pick a date and time",
            Self::Contact => "Contact details",
        }
    }
}

/// Recurrence frequency for repeating appointments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecurrenceFrequency {
    #[default]
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
}

impl RecurrenceFrequency {
    /// Label shown to customers
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Every week",
            Self::Biweekly => "Every 2 weeks",
            Self::Monthly => "Every month",
            Self::Bimonthly => "Every 2 months",
        }
    }
}

/// Kind of outbound customer message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MessageKind {
    Confirmation,
    Reminder,
    ThankYou,
}

/// Editable customer contact field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
}
