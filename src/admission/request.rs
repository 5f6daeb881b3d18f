use std::sync::{Mutex, MutexGuard, PoisonError};

/// Point-in-time copy of a request's decision fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub approved: bool,
    pub reason: String,
    pub pending: bool,
}

#[derive(Debug)]
struct RequestState {
    approved: bool,
    reason: String,
    pending: bool,
}

/// Shared approve/deny/park response sink for one inbound connection attempt.
///
/// The host creates one per connection request and reads the decision back
/// once the request is resolved. The controller mutates the decision exactly
/// once (immediately, or later when the request is dequeued); `pending` is
/// raised while the request sits in the queue and lowered on resolution.
///
/// Interior mutability lets the same `Arc` live in the host's approval
/// pipeline and the controller's queue at once.
#[derive(Debug)]
pub struct ConnectionRequest {
    label: Option<String>,
    state: Mutex<RequestState>,
}

impl ConnectionRequest {
    /// A request the host's own approval logic has already cleared.
    #[must_use]
    pub fn approved() -> Self {
        Self {
            label: None,
            state: Mutex::new(RequestState {
                approved: true,
                reason: String::new(),
                pending: false,
            }),
        }
    }

    /// A request the host already denied upstream; the controller leaves
    /// these untouched.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            label: None,
            state: Mutex::new(RequestState {
                approved: false,
                reason: reason.into(),
                pending: false,
            }),
        }
    }

    /// Attach a display label (player name from the connection payload),
    /// used only for logging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn deny(&self, reason: &str) {
        let mut state = self.lock_state();
        state.approved = false;
        state.reason = reason.to_string();
    }

    pub fn set_pending(&self, pending: bool) {
        self.lock_state().pending = pending;
    }

    pub fn is_approved(&self) -> bool {
        self.lock_state().approved
    }

    pub fn is_denied(&self) -> bool {
        !self.is_approved()
    }

    pub fn is_pending(&self) -> bool {
        self.lock_state().pending
    }

    pub fn snapshot(&self) -> RequestSnapshot {
        let state = self.lock_state();
        RequestSnapshot {
            approved: state.approved,
            reason: state.reason.clone(),
            pending: state.pending,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
