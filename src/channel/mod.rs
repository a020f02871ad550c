//! Publish/subscribe channels.
//!
//! A [`Channel`] is a named, ordered group of [`Recipient`](crate::recipient::Recipient)s.
//! Broadcasting notifies every member synchronously in join order. The
//! [`ChannelRegistry`] maps names to channels for explicit creation and removal.

mod registry;
mod stats;
mod types;

pub use registry::ChannelRegistry;
pub use stats::{ChannelInfo, RegistryStats};
pub use types::{BroadcastReport, Channel, MembershipPolicy};
