//! Registry statistics and channel info structures

use serde::Serialize;
use std::collections::HashMap;

use super::MembershipPolicy;

/// Registry statistics
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_channels: usize,
    /// Sum of member entries over all channels (duplicates counted)
    pub total_memberships: usize,
    pub channels: HashMap<String, usize>,
}

/// Channel information
#[derive(Debug, Clone, Serialize)]
pub struct ChannelInfo {
    pub name: String,
    pub policy: MembershipPolicy,
    pub members: Vec<String>,
}
