//! Join queue configuration types.

use super::defaults::{
    default_connection_delay_ms, default_connection_timeout_ms, default_handshake_grace_ms,
    default_join_queue_enabled,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the connection admission queue.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JoinQueueConfig {
    /// Handle joining players as a queue instead of all at the same time
    #[serde(default = "default_join_queue_enabled")]
    pub enabled: bool,
    /// After how much time to discard a hanging connection (milliseconds)
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    /// Delay between each successful connection (milliseconds)
    #[serde(default = "default_connection_delay_ms")]
    pub connection_delay_ms: u64,
    /// Window for the host to begin the handshake after dequeue (milliseconds)
    #[serde(default = "default_handshake_grace_ms")]
    pub handshake_grace_ms: u64,
}

impl JoinQueueConfig {
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    #[must_use]
    pub const fn connection_delay(&self) -> Duration {
        Duration::from_millis(self.connection_delay_ms)
    }

    #[must_use]
    pub const fn handshake_grace(&self) -> Duration {
        Duration::from_millis(self.handshake_grace_ms)
    }
}

impl Default for JoinQueueConfig {
    fn default() -> Self {
        Self {
            enabled: default_join_queue_enabled(),
            connection_timeout_ms: default_connection_timeout_ms(),
            connection_delay_ms: default_connection_delay_ms(),
            handshake_grace_ms: default_handshake_grace_ms(),
        }
    }
}
