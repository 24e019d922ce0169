//! Outbound message delivery boundary
//!
//! The engine's obligation ends at a composed message; transport is behind
//! the `MessageSender` trait. Two senders ship with the crate: `LogSender`
//! (dry run through tracing) and `Outbox` (in-memory, for tests and replays).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::confirmation::ConfirmationPayload;
use crate::error;
use crate::messages::MessageComposer;
use crate::types::MessageKind;

/// Delivery failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("message content is required")]
    EmptyMessage,

    #[error("message rejected: {0}")]
    Rejected(String),
}

/// A composed message ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    /// Customer phone number, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub body: String,
}

impl OutboundMessage {
    pub fn new(kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            recipient: None,
            body: body.into(),
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Reject messages without content
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.body.trim().is_empty() {
            return Err(DeliveryError::EmptyMessage);
        }
        Ok(())
    }
}

/// Proof of a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: Uuid,
    pub kind: MessageKind,
    pub sent_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    fn issue(kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            sent_at: Utc::now(),
        }
    }
}

/// Something that can transmit a composed message
pub trait MessageSender {
    /// Sender name for logs
    fn name(&self) -> &str;

    fn send(&mut self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

// ============================================================================
// Senders
// ============================================================================

/// Dry-run sender: logs the message instead of transmitting it
#[derive(Debug, Default)]
pub struct LogSender {
    sent: usize,
}

impl LogSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
    }
}

impl MessageSender for LogSender {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&mut self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        message.validate()?;

        let receipt = DeliveryReceipt::issue(message.kind);
        self.sent += 1;
        tracing::info!(
            id = %receipt.id,
            kind = %message.kind,
            recipient = message.recipient.as_deref().unwrap_or("-"),
            "Dry run: message not transmitted"
        );
        tracing::debug!(body = message.body.as_str(), "Message body");

        Ok(receipt)
    }
}

/// In-memory sender that keeps every accepted message
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Vec<(DeliveryReceipt, OutboundMessage)>,
    reject_reason: Option<String>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox that refuses every message with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            reject_reason: Some(reason.into()),
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &OutboundMessage> {
        self.messages.iter().map(|(_, message)| message)
    }

    pub fn receipts(&self) -> impl Iterator<Item = &DeliveryReceipt> {
        self.messages.iter().map(|(receipt, _)| receipt)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSender for Outbox {
    fn name(&self) -> &str {
        "outbox"
    }

    fn send(&mut self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        message.validate()?;
        if let Some(reason) = &self.reject_reason {
            return Err(DeliveryError::Rejected(reason.clone()));
        }

        let receipt = DeliveryReceipt::issue(message.kind);
        self.messages.push((receipt.clone(), message.clone()));
        Ok(receipt)
    }
}

/// Send through `sender`, logging failures before returning them
pub fn deliver(
    sender: &mut dyn MessageSender,
    message: &OutboundMessage,
) -> Result<DeliveryReceipt, DeliveryError> {
    match sender.send(message) {
        Ok(receipt) => Ok(receipt),
        Err(e) => {
            tracing::warn!(
                sender = sender.name(),
                kind = %message.kind,
                error = %e,
                "Message delivery failed"
            );
            Err(e)
        }
    }
}

/// Compose `kind` for a confirmed booking and send it to the customer's phone
pub fn notify(
    composer: &MessageComposer,
    sender: &mut dyn MessageSender,
    kind: MessageKind,
    payload: &ConfirmationPayload,
    catalog: &Catalog,
    currency: &str,
) -> error::Result<(OutboundMessage, DeliveryReceipt)> {
    let body = composer.compose_payload(kind, payload, catalog, currency)?;

    let mut message = OutboundMessage::new(kind, body);
    if let Some(customer) = &payload.customer {
        message = message.with_recipient(customer.phone.clone());
    }

    let receipt = deliver(sender, &message)?;
    Ok((message, receipt))
}
