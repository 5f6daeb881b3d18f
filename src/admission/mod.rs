// Admission module: request sink, confirmation tracking, slot, controller

pub mod confirmation;
pub mod controller;
pub mod request;
pub mod slot;

pub use confirmation::{ConfirmationKind, ConfirmationSet};
pub use controller::{
    AdmissionController, StartDecision, REASON_HOST_DISCONNECTED, REASON_LOBBY_CLOSED,
    REASON_MATCH_UNDERWAY, REASON_SHIP_LANDED,
};
pub use request::{ConnectionRequest, RequestSnapshot};
pub use slot::{AdmissionSlot, SlotOccupant};
