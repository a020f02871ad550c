//! Channel and broadcast report types

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::DeliveryMetrics;
use crate::recipient::Recipient;

/// How a channel treats a recipient that joins more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipPolicy {
    /// Duplicate joins are kept and notified once per entry; leave removes every entry
    #[default]
    Multiset,
    /// A join is ignored if a member with the same identity is present
    Set,
}

/// Result of one broadcast
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastReport {
    /// Identifier correlating the log lines of this broadcast
    pub delivery_id: Uuid,
    /// Name of the broadcasting channel
    pub channel: String,
    /// Number of notify calls that completed
    pub notified: usize,
    /// Number of notify calls that failed (parallel fan-out only)
    pub failed: usize,
    /// Wall-clock time of the whole broadcast in microseconds
    pub latency_us: u64,
}

/// A named group of recipients, notified in join order
pub struct Channel {
    name: String,
    policy: MembershipPolicy,
    members: RwLock<Vec<Arc<dyn Recipient>>>,
}

impl Channel {
    /// Create a channel with multiset membership
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, MembershipPolicy::default())
    }

    pub fn with_policy(name: impl Into<String>, policy: MembershipPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            members: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> MembershipPolicy {
        self.policy
    }

    /// Append a recipient. Returns false if the set policy ignored the join.
    pub fn join(&self, recipient: Arc<dyn Recipient>) -> bool {
        let mut members = self.members.write();

        if self.policy == MembershipPolicy::Set
            && members.iter().any(|m| m.identity() == recipient.identity())
        {
            tracing::debug!(
                channel = %self.name,
                recipient = %recipient.identity(),
                "Recipient already joined, ignoring"
            );
            return false;
        }

        tracing::debug!(channel = %self.name, recipient = %recipient.identity(), "Recipient joined");
        members.push(recipient);
        true
    }

    /// Remove every entry with the same identity as `recipient`
    pub fn leave(&self, recipient: &dyn Recipient) -> usize {
        self.leave_by_identity(recipient.identity())
    }

    /// Remove every entry whose identity equals `identity`, returning how many were removed
    pub fn leave_by_identity(&self, identity: &str) -> usize {
        let mut members = self.members.write();
        let before = members.len();
        members.retain(|m| m.identity() != identity);
        let removed = before - members.len();

        if removed > 0 {
            tracing::debug!(channel = %self.name, recipient = %identity, removed, "Recipient left");
        }

        removed
    }

    /// Member identities in notification order
    pub fn members(&self) -> Vec<String> {
        self.members
            .read()
            .iter()
            .map(|m| m.identity().to_string())
            .collect()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.members.read().iter().any(|m| m.identity() == identity)
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Members at the moment the broadcast starts. Joins and leaves that
    /// happen afterwards do not affect an in-flight broadcast.
    fn snapshot(&self) -> Vec<Arc<dyn Recipient>> {
        self.members.read().clone()
    }

    /// Notify every current member in join order, returning once all were informed
    #[tracing::instrument(name = "channel.broadcast", skip(self, message), fields(channel = %self.name))]
    pub fn broadcast(&self, message: &str) -> BroadcastReport {
        let started = Instant::now();
        let members = self.snapshot();

        for member in &members {
            member.notify(&self.name, message);
        }

        self.report(started, members.len(), 0)
    }

    /// Notify every current member on the blocking pool, one task per member.
    ///
    /// Completes only after every task has finished. Side effects of different
    /// members may interleave; a panicking member is counted as failed.
    ///
    /// Must be awaited inside a Tokio runtime: `spawn_blocking` panics outside one.
    #[tracing::instrument(name = "channel.broadcast_parallel", skip(self, message), fields(channel = %self.name))]
    pub async fn broadcast_parallel(&self, message: &str) -> BroadcastReport {
        let started = Instant::now();
        let members = self.snapshot();

        let tasks = members.into_iter().map(|member| {
            let source = self.name.clone();
            let message = message.to_string();
            tokio::task::spawn_blocking(move || member.notify(&source, &message))
        });

        let mut notified = 0;
        let mut failed = 0;
        for result in join_all(tasks).await {
            match result {
                Ok(()) => notified += 1,
                Err(e) => {
                    failed += 1;
                    tracing::error!(channel = %self.name, error = %e, "Recipient notification failed");
                }
            }
        }

        self.report(started, notified, failed)
    }

    fn report(&self, started: Instant, notified: usize, failed: usize) -> BroadcastReport {
        let elapsed = started.elapsed();
        DeliveryMetrics::record_broadcast(notified as u64, failed as u64, elapsed);

        let report = BroadcastReport {
            delivery_id: Uuid::new_v4(),
            channel: self.name.clone(),
            notified,
            failed,
            latency_us: elapsed.as_micros() as u64,
        };

        tracing::debug!(
            channel = %self.name,
            delivery_id = %report.delivery_id,
            notified,
            failed,
            "Broadcast complete"
        );

        report
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("members", &self.members())
            .finish()
    }
}
