//! Configuration file handling for saving and loading runtime settings.
//!
//! A missing field falls back to its default, so a config file only needs
//! the settings it changes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::BookingConfig;

impl BookingConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise, then validate
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let currency = self.currency.trim();
        if currency.is_empty() {
            anyhow::bail!("Currency must be specified");
        }
        if !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("Currency must be an alphabetic code such as RON or EUR");
        }

        let scheduling = &self.scheduling;
        if scheduling.first_slot_hour > 23 || scheduling.last_slot_hour > 23 {
            anyhow::bail!("Time slot hours must be between 0 and 23");
        }
        if scheduling.first_slot_hour > scheduling.last_slot_hour {
            anyhow::bail!("First time slot must not be after the last time slot");
        }

        EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("Invalid log level {:?}", self.log_level))?;

        Ok(())
    }
}
