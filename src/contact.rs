//! Customer contact details
//!
//! Name and phone are required; email is optional but must look like an
//! address when given. Values are stored as typed and trimmed on output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::confirmation::CustomerDetails;
use crate::types::ContactField;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Contact form values as typed by the customer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactDetails {
    /// Replace one field. Returns whether the value changed.
    pub fn update(&mut self, field: ContactField, value: &str) -> bool {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
        };
        if slot.as_str() == value {
            return false;
        }
        *slot = value.to_string();
        true
    }

    /// Validation message for one field, if it is invalid
    pub fn field_error(&self, field: ContactField) -> Option<&'static str> {
        match field {
            ContactField::Name if self.name.trim().is_empty() => Some("Name is required"),
            ContactField::Phone if self.phone.trim().is_empty() => Some("Phone number is required"),
            ContactField::Email if !is_valid_email(&self.email) => {
                Some("Enter a valid email address")
            }
            _ => None,
        }
    }

    /// Required fields are present and the email, if any, is well-formed
    pub fn is_complete(&self) -> bool {
        [ContactField::Name, ContactField::Phone, ContactField::Email]
            .into_iter()
            .all(|field| self.field_error(field).is_none())
    }

    /// Trimmed values for the confirmation payload
    pub fn to_customer(&self) -> CustomerDetails {
        let email = self.email.trim();
        CustomerDetails {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
        }
    }
}

/// Empty counts as valid; the field is optional
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.is_empty() || EMAIL_RE.is_match(email)
}
