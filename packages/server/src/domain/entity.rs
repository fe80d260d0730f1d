//! Entities.

use chittychat_shared::clock::LogicalTimestamp;

use super::{mailbox::Mailbox, value_object::ParticipantName};

/// Outbound room notification.
///
/// Immutable once built; the fan-out shares one instance between mailboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    text: String,
    timestamp: LogicalTimestamp,
}

impl Notification {
    pub fn new(text: impl Into<String>, timestamp: LogicalTimestamp) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }

    /// "<name> joined the chat"
    pub fn joined(name: &ParticipantName, timestamp: LogicalTimestamp) -> Self {
        Self::new(format!("{} joined the chat", name), timestamp)
    }

    /// "<name>: <message>"
    pub fn said(name: &ParticipantName, message: &str, timestamp: LogicalTimestamp) -> Self {
        Self::new(format!("{}: {}", name, message), timestamp)
    }

    /// "<name> left the chat"
    pub fn left(name: &ParticipantName, timestamp: LogicalTimestamp) -> Self {
        Self::new(format!("{} left the chat", name), timestamp)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> LogicalTimestamp {
        self.timestamp
    }
}

/// A joined client and the sending half of its mailbox.
#[derive(Debug, Clone)]
pub struct Participant {
    pub name: ParticipantName,
    /// Wall-clock join time in Unix milliseconds (display only)
    pub joined_at: i64,
    pub mailbox: Mailbox,
}

impl Participant {
    pub fn new(name: ParticipantName, joined_at: i64, mailbox: Mailbox) -> Self {
        Self {
            name,
            joined_at,
            mailbox,
        }
    }

    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            name: self.name.clone(),
            joined_at: self.joined_at,
        }
    }
}

/// Participant without its mailbox, for read-only views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub name: ParticipantName,
    pub joined_at: i64,
}

/// Read-only snapshot of the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub clock: LogicalTimestamp,
    /// Sorted by name
    pub participants: Vec<ParticipantSummary>,
}
