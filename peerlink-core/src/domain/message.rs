use crate::domain::{PeerId, SendErrorCode, Timestamp};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Transport-assigned message id, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Delivery status of an outgoing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum MessageStatus {
    /// Handed to the transport, awaiting acknowledgment or error
    Sent,
    Acknowledged,
    Failed(SendErrorCode),
}

impl MessageStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MessageStatus::Sent)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Acknowledged => write!(f, "acknowledged"),
            MessageStatus::Failed(code) => write!(f, "failed ({})", code),
        }
    }
}

/// An outgoing message and its delivery state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMessage {
    id: MessageId,
    peer: PeerId,
    payload: Vec<u8>,
    status: MessageStatus,
    created_at: Timestamp,
    resolved_at: Option<Timestamp>,
}

impl PendingMessage {
    pub fn new(id: MessageId, peer: PeerId, payload: Vec<u8>) -> Self {
        Self {
            id,
            peer,
            payload,
            status: MessageStatus::Sent,
            created_at: Timestamp::now(),
            resolved_at: None,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload decoded as UTF-8, with invalid sequences replaced
    pub fn payload_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<Timestamp> {
        self.resolved_at
    }

    /// Milliseconds between send and resolution, once resolved
    pub fn round_trip_millis(&self) -> Option<u64> {
        self.resolved_at.map(|at| at.millis_since(self.created_at))
    }

    /// Apply a terminal status. Callers must check `is_terminal` first.
    pub(crate) fn resolve(&mut self, status: MessageStatus) {
        debug_assert!(!self.status.is_terminal());
        debug_assert!(status.is_terminal());
        self.status = status;
        self.resolved_at = Some(Timestamp::now());
    }
}
