//! Option index
//!
//! Flattened lookup from option identity to its owning step and definition,
//! built once per catalog. Option identities must be unique across the whole
//! catalog, not just within a step: a duplicate would make lookups depend on
//! iteration order, so `build` refuses it.

use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::{Catalog, FlowOption};

/// Errors raised while building the index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("option id '{option_id}' is declared in both step '{first_step}' and step '{second_step}'")]
    DuplicateOption {
        option_id: String,
        first_step: String,
        second_step: String,
    },
}

/// Owning step and definition of one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub step_id: String,
    pub option: FlowOption,
}

/// Read-only option lookup derived from a catalog
#[derive(Debug, Clone, Default)]
pub struct OptionIndex {
    entries: HashMap<String, IndexEntry>,
}

impl OptionIndex {
    /// Build the index in O(total options).
    ///
    /// # Errors
    ///
    /// - `DuplicateOption` if two options anywhere in the catalog share an id
    pub fn build(catalog: &Catalog) -> Result<Self, IndexError> {
        let mut entries: HashMap<String, IndexEntry> = HashMap::new();

        for step in catalog.steps.values() {
            for option in &step.options {
                if let Some(existing) = entries.get(&option.id) {
                    return Err(IndexError::DuplicateOption {
                        option_id: option.id.clone(),
                        first_step: existing.step_id.clone(),
                        second_step: step.id.clone(),
                    });
                }
                entries.insert(
                    option.id.clone(),
                    IndexEntry {
                        step_id: step.id.clone(),
                        option: option.clone(),
                    },
                );
            }
        }

        tracing::debug!(options = entries.len(), "Option index built");
        Ok(Self { entries })
    }

    #[inline]
    pub fn get(&self, option_id: &str) -> Option<&IndexEntry> {
        self.entries.get(option_id)
    }

    #[inline]
    pub fn option(&self, option_id: &str) -> Option<&FlowOption> {
        self.get(option_id).map(|entry| &entry.option)
    }

    #[inline]
    pub fn owning_step(&self, option_id: &str) -> Option<&str> {
        self.get(option_id).map(|entry| entry.step_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
