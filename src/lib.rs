#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools
)]

//! # Lobby Warden
//!
//! Connection admission control for hosted co-op game lobbies.
//!
//! Serializes concurrent incoming connections into an ordered admission
//! sequence: one client connects at a time, with a timeout, dual readiness
//! confirmation, and a start-of-match gate that refuses to launch while
//! players are still connecting. Embed the controller in the host process
//! and forward connection, confirmation, disconnect, and tick events to it.

/// Admission queue, slot, and controller logic
pub mod admission;

/// Configuration loading and types
pub mod config;

/// Collaborator contracts provided by the host process
pub mod host;

/// Structured logging configuration
pub mod logging;

pub use admission::{
    AdmissionController, ConfirmationKind, ConnectionRequest, StartDecision,
};
pub use host::{ClientId, DisconnectError, GameHost};
