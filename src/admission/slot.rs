use std::time::Instant;

use crate::host::ClientId;

use super::confirmation::ConfirmationSet;

/// Who currently occupies the single admission slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOccupant {
    /// A request was dequeued and the host has a short window to begin the
    /// transport handshake before the slot is reclaimed.
    AwaitingHandshake,
    /// A specific client is mid-handshake.
    Client(ClientId),
}

/// The single in-flight admission.
///
/// Invariants: an occupant always has a deadline; a vacant slot with a
/// deadline still in the future is the post-admission grace period that
/// throttles successive dequeues. Confirmations are rebuilt on every
/// assignment and never reset in place.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionSlot {
    pub occupant: Option<SlotOccupant>,
    pub deadline: Option<Instant>,
    pub confirmations: ConfirmationSet,
}

impl AdmissionSlot {
    #[must_use]
    pub const fn vacant() -> Self {
        Self {
            occupant: None,
            deadline: None,
            confirmations: ConfirmationSet::empty(),
        }
    }

    /// Assign a connecting client to the slot with a fresh confirmation set.
    pub fn assign(&mut self, client_id: ClientId, deadline: Instant, required: ConfirmationSet) {
        self.occupant = Some(SlotOccupant::Client(client_id));
        self.deadline = Some(deadline);
        self.confirmations = required;
    }

    /// Reserve the slot for a just-dequeued request that has not yet begun
    /// its transport handshake.
    pub fn begin_handshake(&mut self, deadline: Instant, required: ConfirmationSet) {
        self.occupant = Some(SlotOccupant::AwaitingHandshake);
        self.deadline = Some(deadline);
        self.confirmations = required;
    }

    /// Clear the slot with no grace delay (disconnect, timeout, reset).
    pub fn clear(&mut self) {
        self.occupant = None;
        self.deadline = None;
        self.confirmations = ConfirmationSet::empty();
    }

    /// Vacate the slot but hold off the next dequeue until `deadline`.
    pub fn clear_with_grace(&mut self, deadline: Instant) {
        self.occupant = None;
        self.deadline = Some(deadline);
        self.confirmations = ConfirmationSet::empty();
    }

    #[must_use]
    pub fn holds(&self, client_id: ClientId) -> bool {
        self.occupant == Some(SlotOccupant::Client(client_id))
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Whether the current occupant's deadline has passed. A missing
    /// deadline counts as expired so a malformed slot cannot wedge the queue.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.map_or(true, |deadline| now >= deadline)
    }

    /// Whether a vacated slot is still inside its post-admission grace window.
    #[must_use]
    pub fn in_grace_period(&self, now: Instant) -> bool {
        self.occupant.is_none() && self.deadline.is_some_and(|deadline| now < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn assigned_slot_holds_its_client() {
        let mut slot = AdmissionSlot::vacant();
        let now = Instant::now();
        slot.assign(7, now + Duration::from_secs(3), ConfirmationSet::for_transports(true));
        assert!(slot.holds(7));
        assert!(!slot.holds(8));
        assert!(!slot.is_expired(now));
        assert!(slot.is_expired(now + Duration::from_secs(3)));
    }

    #[test]
    fn grace_period_only_applies_while_vacant() {
        let mut slot = AdmissionSlot::vacant();
        let now = Instant::now();
        slot.clear_with_grace(now + Duration::from_millis(500));
        assert!(slot.in_grace_period(now));
        assert!(!slot.in_grace_period(now + Duration::from_millis(500)));

        slot.assign(1, now + Duration::from_secs(3), ConfirmationSet::for_transports(true));
        assert!(!slot.in_grace_period(now));
    }

    #[test]
    fn clear_drops_deadline_immediately() {
        let mut slot = AdmissionSlot::vacant();
        let now = Instant::now();
        slot.assign(4, now + Duration::from_secs(3), ConfirmationSet::for_transports(true));
        slot.clear();
        assert!(!slot.is_occupied());
        assert!(!slot.in_grace_period(now));
    }
}
