//! Dispatch commands: "send this payload to that channel" as a value.

use std::sync::Arc;

use crate::channel::{BroadcastReport, Channel};

/// A pending send of `payload` to a channel.
///
/// The command holds the channel by `Arc`, so the channel stays alive for as
/// long as the command does, even if it is removed from its registry. The
/// payload cannot change after construction. `execute` performs no validation;
/// gating is the job of a [`ValidationChain`](crate::pipeline::ValidationChain).
#[derive(Debug, Clone)]
pub struct DispatchCommand {
    channel: Arc<Channel>,
    payload: String,
}

impl DispatchCommand {
    pub fn new(channel: Arc<Channel>, payload: impl Into<String>) -> Self {
        Self {
            channel,
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    /// Broadcast the payload to the target channel
    pub fn execute(&self) -> BroadcastReport {
        self.channel.broadcast(&self.payload)
    }
}
