//! Configuration module for Lobby Warden.
//!
//! Supports JSON configuration files, environment variable overrides, and
//! sensible defaults.
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`queue`]: Join queue tuning (enablement, timeouts, admission delay)
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod queue;
pub mod types;
pub mod validation;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use queue::JoinQueueConfig;

pub use types::Config;

pub use validation::validate_config;
