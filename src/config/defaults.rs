//! Default value functions for configuration fields, referenced by the
//! `#[serde(default = ...)]` attributes on the config structs.

use super::logging::LogFormat;

// =============================================================================
// Join Queue Defaults
// =============================================================================

pub const fn default_join_queue_enabled() -> bool {
    true
}

/// After how much time a hanging connection is discarded.
pub const fn default_connection_timeout_ms() -> u64 {
    3000
}

/// Delay between successive successful admissions.
pub const fn default_connection_delay_ms() -> u64 {
    500
}

/// Window given to the host to begin the transport handshake after a
/// request is dequeued.
pub const fn default_handshake_grace_ms() -> u64 {
    1000
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "lobby-warden.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Text
}
