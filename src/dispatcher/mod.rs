use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::channel::ChannelRegistry;
use crate::command::DispatchCommand;
use crate::error::Result;
use crate::pipeline::{ChainOutcome, ValidationChain};

/// Statistics for the dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Commands run through the chain
    pub total_handled: AtomicU64,
    /// Commands refused by a stage
    pub total_rejected: AtomicU64,
    /// Commands that reached a delivering terminal
    pub total_delivered: AtomicU64,
    /// Recipient notifications performed by delivered commands
    pub total_notifications: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_handled: self.total_handled.load(Ordering::Relaxed),
            total_rejected: self.total_rejected.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_notifications: self.total_notifications.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_handled: u64,
    pub total_rejected: u64,
    pub total_delivered: u64,
    pub total_notifications: u64,
}

/// Resolves channels by name and runs commands through one shared chain
pub struct Dispatcher {
    registry: Arc<ChannelRegistry>,
    chain: Arc<ValidationChain>,
    stats: DispatcherStats,
}

impl Dispatcher {
    pub fn new(registry: Arc<ChannelRegistry>, chain: Arc<ValidationChain>) -> Self {
        Self {
            registry,
            chain,
            stats: DispatcherStats::default(),
        }
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    pub fn chain(&self) -> &Arc<ValidationChain> {
        &self.chain
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Build a command for the named channel and handle it
    #[tracing::instrument(name = "dispatcher.submit", skip(self, payload))]
    pub fn submit(&self, channel: &str, payload: &str) -> Result<ChainOutcome> {
        let channel = self.registry.get(channel).inspect_err(|e| {
            tracing::warn!(code = e.code(), error = %e, "Submit refused");
        })?;
        let command = DispatchCommand::new(channel, payload);
        Ok(self.handle(&command))
    }

    /// Handle a prepared command
    pub fn handle(&self, command: &DispatchCommand) -> ChainOutcome {
        let outcome = self.chain.handle(command);

        self.stats.total_handled.fetch_add(1, Ordering::Relaxed);
        match &outcome {
            ChainOutcome::Rejected(rejection) => {
                self.stats.total_rejected.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    channel = %command.channel_name(),
                    stage = rejection.stage,
                    reason = %rejection.reason,
                    "Command rejected"
                );
            }
            ChainOutcome::Delivered(report) => {
                self.stats.total_delivered.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .total_notifications
                    .fetch_add(report.notified as u64, Ordering::Relaxed);
                tracing::info!(
                    channel = %command.channel_name(),
                    delivery_id = %report.delivery_id,
                    notified = report.notified,
                    "Command delivered"
                );
            }
            ChainOutcome::Success => {
                tracing::debug!(channel = %command.channel_name(), "Command accepted");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::pipeline::{MinLengthStage, NonEmptyStage};
    use crate::recipient::ChatUser;

    fn dispatcher() -> Dispatcher {
        let chain = ValidationChain::builder()
            .then(NonEmptyStage)
            .then(MinLengthStage::new(2))
            .deliver();
        Dispatcher::new(Arc::new(ChannelRegistry::new()), Arc::new(chain))
    }

    #[test]
    fn test_submit_unknown_channel() {
        let dispatcher = dispatcher();
        let err = dispatcher.submit("missing", "Hello").unwrap_err();
        assert_eq!(err.code(), "CHANNEL_NOT_FOUND");
        assert!(matches!(err, AppError::ChannelNotFound(name) if name == "missing"));
        assert_eq!(dispatcher.stats().total_handled, 0);
    }

    #[test]
    fn test_stats_tracking() {
        let dispatcher = dispatcher();
        let channel = dispatcher.registry().create("group").unwrap();
        channel.join(Arc::new(ChatUser::new("Jim")));
        channel.join(Arc::new(ChatUser::new("Barb")));

        dispatcher.submit("group", "").unwrap();
        dispatcher.submit("group", "H").unwrap();
        dispatcher.submit("group", "Hello").unwrap();

        let stats = dispatcher.stats();
        assert_eq!(stats.total_handled, 3);
        assert_eq!(stats.total_rejected, 2);
        assert_eq!(stats.total_delivered, 1);
        assert_eq!(stats.total_notifications, 2);
    }
}
