//! Static catalog model
//!
//! A catalog is an immutable graph of steps and options. Every option is
//! either a `Branch` that reveals another step or a `Leaf` that carries a
//! price, a duration and optionally the category it contributes to. The
//! engine never mutates a catalog once a session starts.
//!
//! # Validation
//!
//! Structural defects (missing root, step keyed under the wrong id, a step
//! that reuses a reserved sentinel id) are construction errors. Softer data
//! issues such as a `next_step_id` pointing nowhere are reported as warnings:
//! the engine treats such a branch as a leaf and the user flow keeps working.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AssignmentMode, SelectionMode, SpecialStep};

// ============================================================================
// Options
// ============================================================================

/// What selecting an option leads to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionKind {
    /// Reveals another step when selected
    Branch { next_step_id: String },

    /// A bookable service
    Leaf {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<Decimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_minutes: Option<u32>,
        /// Secondary category this service needs an assignee for
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category_id: Option<String>,
    },
}

/// One choice within a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowOption {
    /// Unique across the whole catalog
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled options are shown but never selectable
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(flatten)]
    pub kind: OptionKind,
}

impl FlowOption {
    /// Create a branch option leading to `next_step_id`
    pub fn branch(id: &str, label: &str, next_step_id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            disabled: false,
            kind: OptionKind::Branch {
                next_step_id: next_step_id.to_string(),
            },
        }
    }

    /// Create a priced leaf option
    pub fn leaf(id: &str, label: &str, price: Decimal, duration_minutes: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            disabled: false,
            kind: OptionKind::Leaf {
                price: Some(price),
                duration_minutes: Some(duration_minutes),
                category_id: None,
            },
        }
    }

    /// Create a disabled placeholder ("coming soon") option
    pub fn unavailable(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            disabled: true,
            kind: OptionKind::Leaf {
                price: None,
                duration_minutes: None,
                category_id: None,
            },
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Attach a secondary category (leaves only; ignored on branches)
    pub fn in_category(mut self, category: &str) -> Self {
        if let OptionKind::Leaf { category_id, .. } = &mut self.kind {
            *category_id = Some(category.to_string());
        }
        self
    }

    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, OptionKind::Branch { .. })
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_branch()
    }

    /// Next step identity for branches
    pub fn next_step_id(&self) -> Option<&str> {
        match &self.kind {
            OptionKind::Branch { next_step_id } => Some(next_step_id),
            OptionKind::Leaf { .. } => None,
        }
    }

    /// Price of a leaf; zero when missing or for branches
    pub fn price(&self) -> Decimal {
        match &self.kind {
            OptionKind::Leaf { price, .. } => price.unwrap_or(Decimal::ZERO),
            OptionKind::Branch { .. } => Decimal::ZERO,
        }
    }

    /// Duration of a leaf in minutes; zero when missing or for branches
    pub fn duration_minutes(&self) -> u32 {
        match &self.kind {
            OptionKind::Leaf {
                duration_minutes, ..
            } => duration_minutes.unwrap_or(0),
            OptionKind::Branch { .. } => 0,
        }
    }

    /// Secondary category of a leaf
    pub fn category_id(&self) -> Option<&str> {
        match &self.kind {
            OptionKind::Leaf { category_id, .. } => category_id.as_deref(),
            OptionKind::Branch { .. } => None,
        }
    }
}

// ============================================================================
// Steps
// ============================================================================

/// One decision point in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub selection_mode: SelectionMode,
    pub options: Vec<FlowOption>,
}

impl Step {
    pub fn new(id: &str, title: &str, selection_mode: SelectionMode) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: None,
            selection_mode,
            options: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_option(mut self, option: FlowOption) -> Self {
        self.options.push(option);
        self
    }

    /// Look up an option of this step by identity
    pub fn option(&self, option_id: &str) -> Option<&FlowOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

// ============================================================================
// Specialists
// ============================================================================

/// A person who can be assigned to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialist {
    pub id: String,
    pub name: String,
    /// Zero means "unrated" (e.g. the "anyone available" entry)
    #[serde(default)]
    pub rating: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_available: Option<NaiveDate>,
}

/// Specialists available for one category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecialistRoster {
    pub label: String,
    #[serde(default)]
    pub specialists: Vec<Specialist>,
}

impl SpecialistRoster {
    pub fn find(&self, specialist_id: &str) -> Option<&Specialist> {
        self.specialists.iter().find(|s| s.id == specialist_id)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Optional flow features appended after the catalog steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentMode>,
    #[serde(default)]
    pub scheduling: bool,
    #[serde(default)]
    pub contact: bool,
}

impl Capabilities {
    /// Enabled special steps, in presentation order
    pub fn special_steps(&self) -> Vec<SpecialStep> {
        let mut steps = Vec::with_capacity(3);
        if self.assignment.is_some() {
            steps.push(SpecialStep::Assignment);
        }
        if self.scheduling {
            steps.push(SpecialStep::Scheduling);
        }
        if self.contact {
            steps.push(SpecialStep::Contact);
        }
        steps
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Structural catalog defects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("root step '{0}' is not defined")]
    MissingRoot(String),

    #[error("step keyed as '{key}' declares id '{id}'")]
    StepKeyMismatch { key: String, id: String },

    #[error("step id '{0}' is reserved for a built-in step")]
    ReservedStepId(String),
}

/// Non-fatal data-integrity findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// A branch points at a step that does not exist; it behaves as a leaf
    DanglingNextStep {
        step_id: String,
        option_id: String,
        next_step_id: String,
    },
    /// A step has no options and can never be satisfied
    EmptyStep { step_id: String },
    /// A step cannot be reached from the root
    UnreachableStep { step_id: String },
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingNextStep {
                step_id,
                option_id,
                next_step_id,
            } => write!(
                f,
                "option '{option_id}' in step '{step_id}' points at missing step '{next_step_id}'"
            ),
            Self::EmptyStep { step_id } => write!(f, "step '{step_id}' has no options"),
            Self::UnreachableStep { step_id } => {
                write!(f, "step '{step_id}' is not reachable from the root")
            }
        }
    }
}

/// The static flow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub root_step_id: String,
    pub steps: IndexMap<String, Step>,
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Category id -> roster of assignable specialists
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub specialists: IndexMap<String, SpecialistRoster>,
}

impl Catalog {
    /// Create a catalog from a root id and its steps, keyed by step id
    pub fn new(root_step_id: &str, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            root_step_id: root_step_id.to_string(),
            steps: steps
                .into_iter()
                .map(|step| (step.id.clone(), step))
                .collect(),
            capabilities: Capabilities::default(),
            specialists: IndexMap::new(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_roster(mut self, category_id: &str, roster: SpecialistRoster) -> Self {
        self.specialists.insert(category_id.to_string(), roster);
        self
    }

    #[inline]
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.get(step_id)
    }

    #[inline]
    pub fn has_step(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    pub fn roster(&self, category_id: &str) -> Option<&SpecialistRoster> {
        self.specialists.get(category_id)
    }

    /// Find a specialist on the roster of a category
    pub fn specialist(&self, category_id: &str, specialist_id: &str) -> Option<&Specialist> {
        self.roster(category_id)?.find(specialist_id)
    }

    /// Check structural invariants and collect data-integrity warnings.
    ///
    /// # Errors
    ///
    /// - `MissingRoot` if the root step is not defined
    /// - `StepKeyMismatch` if a step is stored under a different key than its id
    /// - `ReservedStepId` if a step reuses a built-in sentinel id
    pub fn validate(&self) -> std::result::Result<Vec<CatalogWarning>, CatalogError> {
        if !self.has_step(&self.root_step_id) {
            return Err(CatalogError::MissingRoot(self.root_step_id.clone()));
        }

        for (key, step) in &self.steps {
            if key != &step.id {
                return Err(CatalogError::StepKeyMismatch {
                    key: key.clone(),
                    id: step.id.clone(),
                });
            }
            if SpecialStep::from_step_id(key).is_some() {
                return Err(CatalogError::ReservedStepId(key.clone()));
            }
        }

        let mut warnings = Vec::new();

        for step in self.steps.values() {
            if step.options.is_empty() {
                warnings.push(CatalogWarning::EmptyStep {
                    step_id: step.id.clone(),
                });
            }
            for option in &step.options {
                if let Some(next) = option.next_step_id() {
                    if !self.has_step(next) {
                        warnings.push(CatalogWarning::DanglingNextStep {
                            step_id: step.id.clone(),
                            option_id: option.id.clone(),
                            next_step_id: next.to_string(),
                        });
                    }
                }
            }
        }

        let reachable = self.reachable_steps();
        for step_id in self.steps.keys() {
            if !reachable.contains(step_id.as_str()) {
                warnings.push(CatalogWarning::UnreachableStep {
                    step_id: step_id.clone(),
                });
            }
        }

        Ok(warnings)
    }

    /// Steps reachable from the root through enabled branch options
    fn reachable_steps(&self) -> IndexSet<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut pending = vec![self.root_step_id.as_str()];

        while let Some(step_id) = pending.pop() {
            let Some(step) = self.step(step_id) else {
                continue;
            };
            if !seen.insert(step.id.as_str()) {
                continue;
            }
            pending.extend(
                step.options
                    .iter()
                    .filter(|option| !option.disabled)
                    .filter_map(FlowOption::next_step_id),
            );
        }

        seen
    }

    /// Save the catalog to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog: Self =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        Ok(catalog)
    }
}
