//! Stock recipient that logs and records every notification

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::{notification_line, Recipient};

/// A notification as observed by a recipient
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedMessage {
    /// Name of the channel that sent the message
    pub source: String,
    /// Identity of the receiving recipient
    pub recipient: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl ReceivedMessage {
    /// Human-readable form, e.g. "Jim received a new message from Gardening group: Hi"
    pub fn line(&self) -> String {
        notification_line(&self.recipient, &self.source, &self.message)
    }
}

/// A chat participant
pub struct ChatUser {
    name: String,
    inbox: RwLock<Vec<ReceivedMessage>>,
}

impl ChatUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inbox: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages received so far, oldest first
    pub fn inbox(&self) -> Vec<ReceivedMessage> {
        self.inbox.read().clone()
    }

    pub fn received_count(&self) -> usize {
        self.inbox.read().len()
    }

    /// Drop all recorded messages
    pub fn clear_inbox(&self) {
        self.inbox.write().clear();
    }
}

impl Recipient for ChatUser {
    fn identity(&self) -> &str {
        &self.name
    }

    fn notify(&self, source: &str, message: &str) {
        let received = ReceivedMessage {
            source: source.to_string(),
            recipient: self.name.clone(),
            message: message.to_string(),
            received_at: Utc::now(),
        };

        tracing::info!(
            recipient = %self.name,
            channel = %source,
            "{}",
            received.line()
        );

        self.inbox.write().push(received);
    }
}

impl std::fmt::Debug for ChatUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatUser")
            .field("name", &self.name)
            .field("received", &self.received_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_records_message() {
        let user = ChatUser::new("Jim");
        user.notify("Gardening group", "Hello");

        let inbox = user.inbox();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].source, "Gardening group");
        assert_eq!(inbox[0].recipient, "Jim");
        assert_eq!(inbox[0].message, "Hello");
        assert_eq!(
            inbox[0].line(),
            "Jim received a new message from Gardening group: Hello"
        );
    }

    #[test]
    fn test_identity_is_name() {
        let user = ChatUser::new("Barb");
        assert_eq!(user.identity(), "Barb");
        assert_eq!(user.name(), "Barb");
    }

    #[test]
    fn test_clear_inbox() {
        let user = ChatUser::new("Hannah");
        user.notify("Dog lovers group", "Woof");
        user.notify("Dog lovers group", "Woof again");
        assert_eq!(user.received_count(), 2);

        user.clear_inbox();
        assert_eq!(user.received_count(), 0);
    }
}
