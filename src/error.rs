//! Error handling module for the booking flow
//!
//! Provides centralized error handling with proper error types using thiserror.
//! User-input edge cases never reach this module: the engine treats them as
//! no-ops. These errors cover catalog defects, templating and message
//! delivery. File loading reports through `anyhow` with context instead.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::delivery::DeliveryError;
use crate::engine::index::IndexError;

/// Main error type for the booking flow
#[derive(Error, Debug)]
pub enum BookingError {
    /// Structural catalog defects detected at construction time
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Option index construction failures
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Message template compilation or rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// Outbound message delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Result type alias for booking flow operations
pub type Result<T> = std::result::Result<T, BookingError>;

impl From<handlebars::RenderError> for BookingError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for BookingError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}
