//! Booking Flow Library
//!
//! This library provides a branching service-catalog booking engine: option
//! selection with cascade invalidation, step-group navigation, specialist
//! assignment, appointment scheduling, contact details and the confirmation
//! payload handed to message composition and delivery.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod config_file;
pub mod confirmation;
pub mod contact;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod logic;
pub mod messages;
pub mod presets;
pub mod scheduling;
pub mod types;

// Re-export main types for convenience
pub use catalog::{
    Capabilities, Catalog, CatalogError, CatalogWarning, FlowOption, OptionKind, Specialist,
    SpecialistRoster, Step,
};
pub use config::{BookingConfig, SchedulingConfig};
pub use confirmation::{AppointmentDetails, Assignees, ConfirmationPayload, CustomerDetails};
pub use contact::ContactDetails;
pub use delivery::{
    DeliveryError, DeliveryReceipt, LogSender, MessageSender, OutboundMessage, Outbox, notify,
};
pub use error::BookingError;
pub use messages::{MessageComposer, MessageContext};
pub use scheduling::Schedule;
pub use types::{
    AssignmentMode, ContactField, MessageKind, RecurrenceFrequency, SelectionMode, SpecialStep,
};

// Flow engine
pub use engine::index::{IndexError, OptionIndex};
pub use engine::navigator::{StepGroup, StepNavigator, derive_next_group};
pub use engine::selection::{SelectedOptions, SelectionChange, apply_selection};
pub use engine::session::{FlowEngine, FlowEvent, FlowSession, FlowState, ForwardOutcome, Transition};

// Category resolver and summary aggregator
pub use logic::resolver::{Assignments, SHARED_CATEGORY, prune_assignments, resolve_categories};
pub use logic::summary::{BookingSummary, SelectedService, summarize};
