//! Summary Aggregator
//!
//! Reduces the current leaf selections into a priced, timed summary.
//! Branch options contribute nothing directly. A leaf without a price or a
//! duration counts as zero rather than failing. Totals saturate at the
//! largest representable value instead of overflowing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::engine::index::OptionIndex;
use crate::engine::selection::SelectedOptions;

/// One selected leaf service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedService {
    pub option_id: String,
    pub option_label: String,
    pub step_id: String,
    pub step_title: String,
    pub price: Decimal,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Selected services plus totals
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingSummary {
    pub services: Vec<SelectedService>,
    pub total_price: Decimal,
    pub total_duration_minutes: u32,
}

impl BookingSummary {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Comma-separated service labels
    pub fn service_labels(&self) -> String {
        self.services
            .iter()
            .map(|s| s.option_label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Summarize the current selections, in selection-map order.
pub fn summarize(
    selections: &SelectedOptions,
    catalog: &Catalog,
    index: &OptionIndex,
) -> BookingSummary {
    let mut summary = BookingSummary::default();

    for option_id in selections.values().flatten() {
        let Some(entry) = index.get(option_id) else {
            tracing::warn!(option_id = option_id.as_str(), "Selected option missing from index");
            continue;
        };
        if entry.option.is_branch() {
            continue;
        }

        let step_title = catalog
            .step(&entry.step_id)
            .map(|step| step.title.clone())
            .unwrap_or_default();

        let service = SelectedService {
            option_id: entry.option.id.clone(),
            option_label: entry.option.label.clone(),
            step_id: entry.step_id.clone(),
            step_title,
            price: entry.option.price(),
            duration_minutes: entry.option.duration_minutes(),
            category_id: entry.option.category_id().map(str::to_string),
        };

        let overflows = summary.total_price.checked_add(service.price).is_none()
            || summary
                .total_duration_minutes
                .checked_add(service.duration_minutes)
                .is_none();
        if overflows {
            tracing::warn!(
                option_id = service.option_id.as_str(),
                "Booking totals out of range; saturating"
            );
        }
        summary.total_price = summary.total_price.saturating_add(service.price);
        summary.total_duration_minutes = summary
            .total_duration_minutes
            .saturating_add(service.duration_minutes);
        summary.services.push(service);
    }

    summary
}
