use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Instant;

use crossbeam::queue::SegQueue;
use tracing::{debug, error, warn};

use crate::config::JoinQueueConfig;
use crate::host::{ClientId, GameHost};

use super::confirmation::{ConfirmationKind, ConfirmationSet};
use super::request::ConnectionRequest;
use super::slot::{AdmissionSlot, SlotOccupant};

/// Denial reason when a connection arrives while the landing sequence is
/// already in progress.
pub const REASON_SHIP_LANDED: &str = "Ship has already landed!";
/// Denial reason when the matchmaking channel is closed.
pub const REASON_LOBBY_CLOSED: &str = "Lobby has been closed!";
/// Denial reason for requests still parked when the match begins.
pub const REASON_MATCH_UNDERWAY: &str = "ship has landed!";
/// Denial reason for requests still parked when the hosted session ends.
pub const REASON_HOST_DISCONNECTED: &str = "Host has disconnected!";

const START_CANCELLED_TITLE: &str = "GAME START CANCELLED";

/// Outcome of a start-of-match attempt routed through the admission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// The start continuation was invoked.
    Proceeded,
    /// The start was cancelled; `connecting` players are still being admitted.
    Refused { connecting: usize },
}

/// Slot and gate state guarded by one lock (see [`AdmissionController`]).
#[derive(Debug)]
struct GateGuarded {
    slot: AdmissionSlot,
    /// True while a start-of-match transition is irreversibly in progress.
    landing: bool,
}

/// Serializes concurrent incoming connections into an ordered admission
/// sequence.
///
/// Connection requests are parked in a FIFO queue; at most one client is
/// in flight at a time. An admission completes when the client delivers its
/// required readiness confirmations, expires after the configured timeout,
/// or ends early on disconnect. A short grace delay between admissions
/// throttles the join rate, and a start-of-match gate refuses to launch
/// while any admission is outstanding.
///
/// Requests may be enqueued from network callback contexts concurrently
/// with the host-loop [`tick`](Self::tick); the queue is lock-free and the
/// slot/gate state sits behind a single mutex that `tick` only try-locks,
/// so the host loop is never blocked.
pub struct AdmissionController {
    host: Arc<dyn GameHost>,
    config: JoinQueueConfig,
    pending: SegQueue<Arc<ConnectionRequest>>,
    gate: Mutex<GateGuarded>,
}

impl AdmissionController {
    #[must_use]
    pub fn new(config: JoinQueueConfig, host: Arc<dyn GameHost>) -> Self {
        Self {
            host,
            config,
            pending: SegQueue::new(),
            gate: Mutex::new(GateGuarded {
                slot: AdmissionSlot::vacant(),
                landing: false,
            }),
        }
    }

    /// Policy decision for an inbound connection request.
    ///
    /// Runs after the host's own approval logic: a request the host already
    /// denied is left untouched. Otherwise the request is denied while the
    /// landing sequence is in progress or the lobby is closed, approved
    /// directly when queueing is disabled, and parked in the queue
    /// otherwise.
    pub fn on_connection_requested(&self, request: &Arc<ConnectionRequest>) {
        if request.is_denied() {
            return;
        }

        if self.lock_gate().landing {
            request.deny(REASON_SHIP_LANDED);
            return;
        }

        if !self.host.lobby_open() {
            request.deny(REASON_LOBBY_CLOSED);
            return;
        }

        if self.host.match_started() {
            debug!(label = request.label(), "approving late join into a started match");
        }

        if !self.config.enabled {
            return;
        }

        request.set_pending(true);
        self.pending.push(Arc::clone(request));
        warn!(
            label = request.label(),
            queued = self.pending.len(),
            "connection request parked"
        );
    }

    /// The host began the transport handshake for `client_id`; bind the
    /// admission slot to it. This is the only place a concrete client is
    /// assigned to the slot.
    pub fn on_client_connect_low(&self, client_id: ClientId, now: Instant) {
        if !self.host.is_server() || !self.config.enabled {
            return;
        }

        let required = ConfirmationSet::for_transports(self.host.secondary_transport_enabled());
        let mut gate = self.lock_gate();
        gate.slot
            .assign(client_id, now + self.config.connection_timeout(), required);
    }

    /// A readiness confirmation arrived from `client_id`. Signals from any
    /// client other than the slot occupant are ignored. Once every required
    /// confirmation is in, the slot is vacated with a grace delay before the
    /// next dequeue.
    pub fn on_confirmation(&self, kind: ConfirmationKind, client_id: ClientId, now: Instant) {
        if !self.host.is_server() {
            return;
        }

        let mut gate = self.lock_gate();
        if !gate.slot.holds(client_id) {
            debug!(client_id, ?kind, "confirmation from client not being admitted, ignoring");
            return;
        }

        gate.slot.confirmations.record(kind);
        if gate.slot.confirmations.is_complete() {
            warn!(client_id, "client completed the connection");
            gate.slot
                .clear_with_grace(now + self.config.connection_delay());
        } else {
            let outstanding: Vec<_> = gate.slot.confirmations.missing().collect();
            warn!(client_id, ?outstanding, "client still synchronizing");
        }
    }

    /// A client dropped. Frees the slot immediately, with no grace delay,
    /// if that client was the one being admitted.
    pub fn on_disconnect(&self, client_id: ClientId) {
        if !self.host.is_server() {
            return;
        }

        let mut gate = self.lock_gate();
        if gate.slot.holds(client_id) {
            debug!(client_id, "connecting client dropped, freeing admission slot");
            gate.slot.clear();
        }
    }

    /// Per-frame scheduler: expires the in-flight admission, dequeues the
    /// next parked request, or sweeps the queue once the match is underway.
    ///
    /// Uses a non-blocking lock attempt and skips the cycle when the gate
    /// lock is held elsewhere; the next tick picks the work back up.
    pub fn tick(&self, now: Instant) {
        if !self.host.is_server() {
            return;
        }

        let mut gate = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };

        match gate.slot.occupant {
            Some(occupant) => {
                if !gate.slot.is_expired(now) {
                    return;
                }

                if let SlotOccupant::Client(client_id) = occupant {
                    warn!(client_id, "admission handshake expired, disconnecting");
                    if let Err(err) = self.host.force_disconnect(client_id) {
                        error!(client_id, %err, "forced disconnect failed");
                    }
                }
                gate.slot.clear();
            }
            None if self.host.in_lobby_phase() => {
                if gate.slot.in_grace_period(now) {
                    return;
                }

                let Some(request) = self.pending.pop() else {
                    return;
                };

                request.set_pending(false);
                if request.is_denied() {
                    // Decided while parked; nothing left to admit.
                    return;
                }

                warn!(
                    label = request.label(),
                    remaining = self.pending.len(),
                    "connection request resumed"
                );
                let required =
                    ConfirmationSet::for_transports(self.host.secondary_transport_enabled());
                gate.slot
                    .begin_handshake(now + self.config.handshake_grace(), required);
            }
            None => {
                let mut swept = 0usize;
                while let Some(request) = self.pending.pop() {
                    request.deny(REASON_MATCH_UNDERWAY);
                    request.set_pending(false);
                    swept += 1;
                }
                if swept > 0 {
                    warn!(swept, "denied parked requests, ship has departed");
                }
            }
        }
    }

    /// Gate a start-of-match attempt. With admissions outstanding the start
    /// is cancelled and the operator told how many players are still
    /// connecting; otherwise the landing gate closes and `proceed` runs.
    ///
    /// Sessions that are not server-authoritative or already out of the
    /// lobby phase bypass the gate entirely.
    pub fn on_start_game_attempt<F: FnOnce()>(&self, proceed: F) -> StartDecision {
        if !self.host.is_server() || !self.host.in_lobby_phase() {
            proceed();
            return StartDecision::Proceeded;
        }

        let connecting = {
            let mut gate = self.lock_gate();
            let connecting = self.pending.len() + usize::from(gate.slot.is_occupied());
            if connecting == 0 {
                gate.landing = true;
            }
            connecting
        };

        if connecting > 0 {
            self.host.cancel_start();
            self.host.display_operator_message(
                START_CANCELLED_TITLE,
                &format!("{connecting} Players Connecting!!"),
            );
            warn!(connecting, "start of match refused, players still connecting");
            return StartDecision::Refused { connecting };
        }

        proceed();
        StartDecision::Proceeded
    }

    /// The landing sequence finished; joins may be considered again.
    pub fn on_landing_complete(&self) {
        self.lock_gate().landing = false;
    }

    /// Session teardown: clears the slot and gate and denies every parked
    /// request. Never fails.
    pub fn reset(&self) {
        {
            let mut gate = self.lock_gate();
            gate.slot.clear();
            gate.landing = false;
        }

        let parked = self.pending.len();
        if parked > 0 {
            warn!(parked, "flushing admission queue on session teardown");
        }
        while let Some(request) = self.pending.pop() {
            request.deny(REASON_HOST_DISCONNECTED);
            request.set_pending(false);
        }
    }

    /// Number of requests parked in the queue.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether an admission is currently in flight.
    #[must_use]
    pub fn has_in_flight(&self) -> bool {
        self.lock_gate().slot.is_occupied()
    }

    /// Whether the landing gate is closed to new joins.
    #[must_use]
    pub fn is_landing(&self) -> bool {
        self.lock_gate().landing
    }

    /// Parked plus in-flight connections, as reported to the operator on a
    /// refused start.
    #[must_use]
    pub fn connecting_count(&self) -> usize {
        self.pending.len() + usize::from(self.has_in_flight())
    }

    /// True when no admission work is outstanding and a match may start.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.connecting_count() == 0
    }

    fn lock_gate(&self) -> MutexGuard<'_, GateGuarded> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
