/// Readiness signals a connecting client must deliver before the next
/// admission can begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationKind {
    /// Held-items/state replication acknowledged by the joining client.
    StateSync,
    /// Player identity (name) propagated over the secondary transport.
    IdentitySync,
}

impl ConfirmationKind {
    const fn bit(self) -> u8 {
        match self {
            Self::StateSync => 0b01,
            Self::IdentitySync => 0b10,
        }
    }
}

/// Bitmask of required vs. received confirmations for the in-flight client.
///
/// Bits are monotonic: a received confirmation is never taken back, the set
/// is only rebuilt when the slot is reassigned. Signals whose transport is
/// unavailable are excluded from the required mask up front, so "complete"
/// naturally degrades to the signals that can actually arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationSet {
    required: u8,
    received: u8,
}

impl ConfirmationSet {
    /// Build the required mask for a fresh admission. The identity-sync
    /// signal rides the secondary transport and is dropped when that
    /// transport is disabled.
    #[must_use]
    pub fn for_transports(secondary_transport: bool) -> Self {
        let mut required = ConfirmationKind::StateSync.bit();
        if secondary_transport {
            required |= ConfirmationKind::IdentitySync.bit();
        }
        Self {
            required,
            received: 0,
        }
    }

    /// An empty set that is trivially complete; placeholder for a cleared slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            required: 0,
            received: 0,
        }
    }

    pub fn record(&mut self, kind: ConfirmationKind) {
        self.received |= kind.bit();
    }

    #[must_use]
    pub fn has(self, kind: ConfirmationKind) -> bool {
        self.received & kind.bit() != 0
    }

    /// True once every required signal has been received.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.received & self.required == self.required
    }

    /// Required signals still outstanding, for log messages.
    #[must_use]
    pub fn missing(self) -> impl Iterator<Item = ConfirmationKind> {
        let outstanding = self.required & !self.received;
        [ConfirmationKind::StateSync, ConfirmationKind::IdentitySync]
            .into_iter()
            .filter(move |kind| outstanding & kind.bit() != 0)
    }
}
