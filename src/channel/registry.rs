use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::metrics::ChannelMetrics;

use super::{Channel, ChannelInfo, MembershipPolicy, RegistryStats};

/// Manages all named channels
pub struct ChannelRegistry {
    /// channel_name -> Channel
    channels: DashMap<String, Arc<Channel>>,
    /// Policy given to channels created through the registry
    default_policy: MembershipPolicy,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::with_policy(MembershipPolicy::default())
    }

    pub fn with_policy(default_policy: MembershipPolicy) -> Self {
        Self {
            channels: DashMap::new(),
            default_policy,
        }
    }

    pub fn default_policy(&self) -> MembershipPolicy {
        self.default_policy
    }

    /// Create a new channel, failing if the name is taken
    pub fn create(&self, name: &str) -> Result<Arc<Channel>> {
        let channel = match self.channels.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(AppError::ChannelExists(name.to_string())),
            Entry::Vacant(entry) => {
                let channel = Arc::new(Channel::with_policy(name, self.default_policy));
                entry.insert(channel.clone());
                channel
            }
        };

        ChannelMetrics::set_active(self.channels.len());
        tracing::info!(channel = %name, policy = ?self.default_policy, "Channel created");

        Ok(channel)
    }

    /// Get an existing channel or create it
    pub fn get_or_create(&self, name: &str) -> Arc<Channel> {
        if let Some(channel) = self.channels.get(name) {
            return channel.clone();
        }

        let channel = self
            .channels
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Channel::with_policy(name, self.default_policy)))
            .clone();

        ChannelMetrics::set_active(self.channels.len());
        channel
    }

    /// Get a channel by name
    pub fn get(&self, name: &str) -> Result<Arc<Channel>> {
        self.channels
            .get(name)
            .map(|c| c.clone())
            .ok_or_else(|| AppError::ChannelNotFound(name.to_string()))
    }

    /// Remove a channel from the registry.
    ///
    /// Commands already holding the channel keep it alive and can still execute.
    pub fn remove(&self, name: &str) -> Result<Arc<Channel>> {
        let (_, channel) = self
            .channels
            .remove(name)
            .ok_or_else(|| AppError::ChannelNotFound(name.to_string()))?;

        ChannelMetrics::set_active(self.channels.len());
        tracing::info!(channel = %name, "Channel removed");

        Ok(channel)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// All channel names, sorted
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn info(&self, name: &str) -> Result<ChannelInfo> {
        let channel = self.get(name)?;
        Ok(ChannelInfo {
            name: channel.name().to_string(),
            policy: channel.policy(),
            members: channel.members(),
        })
    }

    /// Get statistics
    pub fn stats(&self) -> RegistryStats {
        let mut channels = HashMap::new();
        let mut total_memberships = 0;
        for entry in self.channels.iter() {
            let count = entry.value().len();
            total_memberships += count;
            channels.insert(entry.key().clone(), count);
        }

        RegistryStats {
            total_channels: channels.len(),
            total_memberships,
            channels,
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
