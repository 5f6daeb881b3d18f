//! Root configuration types.

use super::logging::LoggingConfig;
use super::queue::JoinQueueConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for Lobby Warden.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub join_queue: JoinQueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
