use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by the control and status channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Multicast group name or literal IP address
    pub group: String,
    /// Status/control UDP port on the group
    pub status_port: u16,
    /// Receive timeout for the status loop and send timeout for control
    pub socket_timeout: Duration,
    /// How long to wait for the receive loop to exit on stop
    pub stop_grace: Duration,
    /// SSRC allow-list for the status cache; empty accepts all streams
    pub ssrc_filter: Vec<u32>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            group: super::DEFAULT_MCAST_GROUP.to_string(),
            status_port: super::DEFAULT_STAT_PORT,
            socket_timeout: Duration::from_millis(200),
            stop_grace: Duration::from_secs(2),
            ssrc_filter: Vec::new(),
        }
    }
}

impl ChannelConfig {
    /// Creates a configuration for the given multicast group name
    pub fn for_group(group: impl Into<String>) -> Self {
        ChannelConfig {
            group: group.into(),
            ..Default::default()
        }
    }

    /// Restricts the status cache to the given SSRCs
    pub fn with_ssrc_filter(mut self, ssrcs: Vec<u32>) -> Self {
        self.ssrc_filter = ssrcs;
        self
    }
}
