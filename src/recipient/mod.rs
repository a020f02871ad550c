//! Recipients: the subscriber side of a channel.
//!
//! Any type implementing [`Recipient`] can join a [`Channel`](crate::channel::Channel).
//! Channels hold recipients as `Arc<dyn Recipient>` and compare them by
//! [`Recipient::identity`], never by pointer.

mod chat_user;

pub use chat_user::{ChatUser, ReceivedMessage};

/// A named entity that can be notified by a channel
pub trait Recipient: Send + Sync {
    /// Stable identity, used as the equality key when leaving a channel
    fn identity(&self) -> &str;

    /// Called once per broadcast the recipient is a member for
    fn notify(&self, source: &str, message: &str);
}

/// Render the line a recipient reports when it receives a message
pub fn notification_line(recipient: &str, source: &str, message: &str) -> String {
    format!(
        "{} received a new message from {}: {}",
        recipient, source, message
    )
}
