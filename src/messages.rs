//! Customer message composition
//!
//! Renders plain-text confirmation, reminder and thank-you messages from a
//! confirmation payload. Every message is a list of handlebars line
//! templates; a line that renders empty is dropped, and a `Gap` inserts one
//! blank line before the next line that is actually emitted.

use handlebars::Handlebars;
use rust_decimal::Decimal;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::catalog::Catalog;
use crate::confirmation::{Assignees, ConfirmationPayload};
use crate::error::Result;
use crate::logic::resolver::SHARED_CATEGORY;
use crate::types::MessageKind;

enum Line {
    Text(&'static str),
    Gap,
}

const CONFIRMATION: &[Line] = &[
    Line::Text("{{greeting}} Your appointment is confirmed."),
    Line::Gap,
    Line::Text("{{#if appointment}}We look forward to seeing you on {{appointment}}.{{/if}}"),
    Line::Gap,
    Line::Text("{{#if services}}Services: {{services}}.{{/if}}"),
    Line::Text("{{#if specialists}}Specialist: {{specialists}}.{{/if}}"),
    Line::Text("Total duration: {{duration}}"),
    Line::Text("Price: {{price}}"),
    Line::Text("{{#if recurrence}}Recurring: {{recurrence}}{{/if}}"),
    Line::Gap,
    Line::Text("{{#if waitlist}}You are on the waitlist in case an earlier slot opens up.{{/if}}"),
    Line::Gap,
    Line::Text("Let us know if you need anything adjusted."),
];

const REMINDER: &[Line] = &[
    Line::Text(
        "{{greeting}} This is a reminder of your appointment tomorrow\
         {{#if reminder_date}}, {{reminder_date}}{{/if}}{{#if time}}, at {{time}}{{/if}}.",
    ),
    Line::Gap,
    Line::Text("{{#if services}}Services: {{services}}.{{/if}}"),
    Line::Text("{{#if specialists}}Specialist: {{specialists}}.{{/if}}"),
    Line::Text("Total duration: {{duration}}."),
    Line::Gap,
    Line::Text("Please confirm your booking by replying to this message."),
];

const THANK_YOU: &[Line] = &[
    Line::Text("{{greeting}} It was a pleasure having you at the salon."),
    Line::Gap,
    Line::Text("You can book your next visit right here."),
];

fn lines(kind: MessageKind) -> &'static [Line] {
    match kind {
        MessageKind::Confirmation => CONFIRMATION,
        MessageKind::Reminder => REMINDER,
        MessageKind::ThankYou => THANK_YOU,
    }
}

// ============================================================================
// Context
// ============================================================================

/// Values available to message templates
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MessageContext {
    pub greeting: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialists: Option<String>,
    pub duration: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    pub waitlist: bool,
}

impl MessageContext {
    /// Derive template values from a payload.
    ///
    /// Specialist ids are resolved to names through the catalog's rosters;
    /// an id missing from the roster is shown as-is.
    pub fn from_payload(payload: &ConfirmationPayload, catalog: &Catalog, currency: &str) -> Self {
        let name = payload
            .customer
            .as_ref()
            .map(|c| c.name.trim())
            .filter(|n| !n.is_empty());

        let services = payload
            .services
            .iter()
            .map(|s| s.option_label.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let appointment = payload.appointment.as_ref();

        Self {
            greeting: greeting(name),
            appointment: appointment.map(|a| {
                format!("{} at {}", a.date.format("%A, %-d %B %Y"), a.time.format("%H:%M"))
            }),
            reminder_date: appointment.map(|a| a.date.format("%-d %B").to_string()),
            time: appointment.map(|a| a.time.format("%H:%M").to_string()),
            services: (!services.is_empty()).then_some(services),
            specialists: specialist_summary(payload, catalog),
            duration: format_duration(payload.total_duration_minutes),
            price: format_price(payload.total_price, currency),
            recurrence: appointment
                .and_then(|a| a.recurrence_label.as_ref())
                .map(|label| label.to_lowercase()),
            waitlist: appointment.is_some_and(|a| a.waitlist_enabled),
        }
    }
}

fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Hi, {name}!"),
        None => "Hi!".to_string(),
    }
}

fn specialist_summary(payload: &ConfirmationPayload, catalog: &Catalog) -> Option<String> {
    let describe = |category: &str, specialist_id: &str| -> String {
        let Some(roster) = catalog.roster(category) else {
            return specialist_id.to_string();
        };
        match roster.find(specialist_id) {
            Some(specialist) if category == SHARED_CATEGORY => specialist.name.clone(),
            Some(specialist) => format!("{} ({})", specialist.name, roster.label),
            None => specialist_id.to_string(),
        }
    };

    let names: Vec<String> = match payload.assignees.as_ref()? {
        Assignees::PerCategory(map) => map
            .iter()
            .map(|(category, specialist)| describe(category, specialist))
            .collect(),
        Assignees::Single(specialist) if specialist.is_empty() => Vec::new(),
        Assignees::Single(specialist) => vec![describe(SHARED_CATEGORY, specialist)],
    };

    (!names.is_empty()).then(|| names.join(", "))
}

/// `90` -> `1h 30m`, `120` -> `2h`, `45` -> `45m`
pub fn format_duration(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, rest) => format!("{rest}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, rest) => format!("{hours}h {rest}m"),
    }
}

/// `200` + `RON` -> `200 RON`
pub fn format_price(amount: Decimal, currency: &str) -> String {
    format!("{} {}", amount.normalize(), currency)
}

// ============================================================================
// Composer
// ============================================================================

/// Renders customer messages from compiled line templates
pub struct MessageComposer {
    registry: Handlebars<'static>,
}

impl MessageComposer {
    /// Compile every line template
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(handlebars::no_escape);

        for kind in MessageKind::iter() {
            for (i, line) in lines(kind).iter().enumerate() {
                if let Line::Text(template) = line {
                    registry.register_template_string(&template_name(kind, i), *template)?;
                }
            }
        }

        Ok(Self { registry })
    }

    /// Render one message kind
    pub fn compose(&self, kind: MessageKind, context: &MessageContext) -> Result<String> {
        let mut out: Vec<String> = Vec::new();
        let mut gap = false;

        for (i, line) in lines(kind).iter().enumerate() {
            match line {
                Line::Gap => gap = true,
                Line::Text(_) => {
                    let rendered = self.registry.render(&template_name(kind, i), context)?;
                    if rendered.trim().is_empty() {
                        continue;
                    }
                    if gap && !out.is_empty() {
                        out.push(String::new());
                    }
                    gap = false;
                    out.push(rendered);
                }
            }
        }

        Ok(out.join("\n"))
    }

    /// Render a message straight from a payload
    pub fn compose_payload(
        &self,
        kind: MessageKind,
        payload: &ConfirmationPayload,
        catalog: &Catalog,
        currency: &str,
    ) -> Result<String> {
        self.compose(kind, &MessageContext::from_payload(payload, catalog, currency))
    }
}

fn template_name(kind: MessageKind, line: usize) -> String {
    format!("{kind}:{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Specialist, SpecialistRoster, Step};
    use crate::confirmation::{AppointmentDetails, CustomerDetails};
    use crate::logic::summary::BookingSummary;
    use crate::types::RecurrenceFrequency;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::new("root", Vec::<Step>::new()).with_roster(
            "hair",
            SpecialistRoster {
                label: "Hair".to_string(),
                specialists: vec![Specialist {
                    id: "ana".to_string(),
                    name: "Ana".to_string(),
                    rating: 4.9,
                    first_available: None,
                }],
            },
        )
    }

    fn payload() -> ConfirmationPayload {
        let mut payload = ConfirmationPayload::from_summary(BookingSummary {
            services: Vec::new(),
            total_price: dec!(200),
            total_duration_minutes: 90,
        });
        payload.assignees = Some(Assignees::PerCategory(
            [("hair".to_string(), "ana".to_string())].into_iter().collect(),
        ));
        payload.appointment = Some(AppointmentDetails::new(
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            Some(RecurrenceFrequency::Monthly),
            true,
        ));
        payload.customer = Some(CustomerDetails {
            name: "Ioana".to_string(),
            phone: "0722".to_string(),
            email: None,
        });
        payload
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(0), "0m");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(200), "RON"), "200 RON");
        assert_eq!(format_price(dec!(70.50), "EUR"), "70.5 EUR");
    }

    #[test]
    fn test_context_from_payload() {
        let context = MessageContext::from_payload(&payload(), &catalog(), "RON");
        assert_eq!(context.greeting, "Hi, Ioana!");
        assert_eq!(context.appointment.as_deref(), Some("Thursday, 12 March 2026 at 14:00"));
        assert_eq!(context.specialists.as_deref(), Some("Ana (Hair)"));
        assert_eq!(context.recurrence.as_deref(), Some("every month"));
        assert_eq!(context.services, None);
        assert!(context.waitlist);
    }

    #[test]
    fn test_unknown_specialist_shown_by_id() {
        let mut payload = payload();
        payload.assignees = Some(Assignees::Single("mihai".to_string()));
        let context = MessageContext::from_payload(&payload, &catalog(), "RON");
        assert_eq!(context.specialists.as_deref(), Some("mihai"));
    }

    #[test]
    fn test_confirmation_message() {
        let composer = MessageComposer::new().unwrap();
        let message = composer
            .compose_payload(MessageKind::Confirmation, &payload(), &catalog(), "RON")
            .unwrap();

        let expected = "Hi, Ioana! Your appointment is confirmed.\n\
                        \n\
                        We look forward to seeing you on Thursday, 12 March 2026 at 14:00.\n\
                        \n\
                        Specialist: Ana (Hair).\n\
                        Total duration: 1h 30m\n\
                        Price: 200 RON\n\
                        Recurring: every month\n\
                        \n\
                        You are on the waitlist in case an earlier slot opens up.\n\
                        \n\
                        Let us know if you need anything adjusted.";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_minimal_confirmation_drops_empty_lines() {
        let composer = MessageComposer::new().unwrap();
        let context = MessageContext {
            greeting: greeting(None),
            duration: format_duration(30),
            price: format_price(dec!(70), "RON"),
            ..MessageContext::default()
        };
        let message = composer.compose(MessageKind::Confirmation, &context).unwrap();
        assert_eq!(
            message,
            "Hi! Your appointment is confirmed.\n\nTotal duration: 30m\nPrice: 70 RON\n\nLet us know if you need anything adjusted."
        );
    }

    #[test]
    fn test_reminder_message() {
        let composer = MessageComposer::new().unwrap();
        let message = composer
            .compose_payload(MessageKind::Reminder, &payload(), &catalog(), "RON")
            .unwrap();
        assert!(message.starts_with(
            "Hi, Ioana! This is a reminder of your appointment tomorrow, 12 March, at 14:00."
        ));
        assert!(message.contains("Total duration: 1h 30m."));
    }

    #[test]
    fn test_thank_you_message() {
        let composer = MessageComposer::new().unwrap();
        let context = MessageContext {
            greeting: greeting(Some("Ana")),
            ..MessageContext::default()
        };
        let message = composer.compose(MessageKind::ThankYou, &context).unwrap();
        assert_eq!(
            message,
            "Hi, Ana! It was a pleasure having you at the salon.\n\nYou can book your next visit right here."
        );
    }

    #[test]
    fn test_no_html_escaping() {
        let composer = MessageComposer::new().unwrap();
        let context = MessageContext {
            greeting: greeting(Some("Ana & Ioana")),
            ..MessageContext::default()
        };
        let message = composer.compose(MessageKind::ThankYou, &context).unwrap();
        assert!(message.starts_with("Hi, Ana & Ioana!"));
    }
}
