//! Logic modules: derive secondary state from the current selections.
//!
//! # Modules
//!
//! - `resolver` - Category resolution and assignment pruning
//! - `summary` - Priced, timed booking summary

pub mod resolver;
pub mod summary;
