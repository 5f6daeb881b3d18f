
use std::sync::Arc;
use std::time::{Duration, Instant};

use lobby_warden::admission::{REASON_MATCH_UNDERWAY, REASON_SHIP_LANDED};
use lobby_warden::config::JoinQueueConfig;
use lobby_warden::{AdmissionController, ConfirmationKind, StartDecision};
use proptest::prelude::*;
use test_helpers::{approved_request, create_controller, TestHost};

const TIMEOUT: Duration = Duration::from_millis(3000);
const DELAY: Duration = Duration::from_millis(500);

/// Drive one complete admission: dequeue, handshake, dual confirmation,
/// grace delay. Returns the time at which the next dequeue may happen.
fn complete_one_admission(
    controller: &AdmissionController,
    client_id: u64,
    mut now: Instant,
) -> Instant {
    controller.tick(now);
    assert!(controller.has_in_flight(), "dequeue should occupy the slot");

    controller.on_client_connect_low(client_id, now);
    controller.on_confirmation(ConfirmationKind::StateSync, client_id, now);
    controller.on_confirmation(ConfirmationKind::IdentitySync, client_id, now);
    assert!(!controller.has_in_flight(), "confirmed admission should vacate the slot");

    now += DELAY;
    now
}

#[test]
fn sequential_admissions_preserve_fifo_order() {
    let (controller, _host) = create_controller();
    let requests: Vec<_> = (0..4)
        .map(|i| approved_request(&format!("Player{i}")))
        .collect();
    for request in &requests {
        controller.on_connection_requested(request);
    }
    assert_eq!(controller.queue_len(), 4);

    let mut now = Instant::now();
    for (i, request) in requests.iter().enumerate() {
        now = complete_one_admission(&controller, i as u64 + 1, now);

        // Exactly the requests after position i are still parked.
        assert!(!request.is_pending());
        for later in &requests[i + 1..] {
            assert!(later.is_pending(), "request {i} resolved out of order");
        }
    }

    assert_eq!(controller.queue_len(), 0);
    assert!(requests.iter().all(|r| r.is_approved()));
}

#[test]
fn timed_out_admission_does_not_stall_the_queue() {
    let (controller, host) = create_controller();
    let stalled = approved_request("Stalled");
    let patient = approved_request("Patient");
    controller.on_connection_requested(&stalled);
    controller.on_connection_requested(&patient);

    let mut now = Instant::now();
    controller.tick(now);
    controller.on_client_connect_low(1, now);

    // Client 1 never confirms; it is dropped at the deadline.
    now += TIMEOUT;
    controller.tick(now);
    assert_eq!(host.disconnects(), vec![1]);
    assert!(!controller.has_in_flight());

    // The next request is admitted on the following cycle.
    controller.tick(now);
    assert!(!patient.is_pending());
    assert!(controller.has_in_flight());
}

#[test]
fn concurrent_enqueues_are_all_parked_and_swept() {
    let (controller, host) = create_controller();

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let controller = Arc::clone(&controller);
            std::thread::spawn(move || {
                for i in 0..25 {
                    let request = approved_request(&format!("T{t}-{i}"));
                    controller.on_connection_requested(&request);
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().expect("enqueue thread panicked");
    }

    assert_eq!(controller.queue_len(), 100);

    // The match begins with everything still parked: one sweep denies all.
    host.in_lobby_phase
        .store(false, std::sync::atomic::Ordering::SeqCst);
    controller.tick(Instant::now());
    assert_eq!(controller.queue_len(), 0);
}

#[test]
fn departure_sweep_denies_with_reason() {
    let (controller, host) = create_controller();
    let first = approved_request("First");
    let second = approved_request("Second");
    controller.on_connection_requested(&first);
    controller.on_connection_requested(&second);

    host.in_lobby_phase
        .store(false, std::sync::atomic::Ordering::SeqCst);
    controller.tick(Instant::now());

    for request in [&first, &second] {
        let snapshot = request.snapshot();
        assert!(!snapshot.approved);
        assert_eq!(snapshot.reason, REASON_MATCH_UNDERWAY);
        assert!(!snapshot.pending);
    }
}

#[test]
fn start_gate_refuses_until_admissions_finish() {
    let (controller, host) = create_controller();
    let requests: Vec<_> = (0..2)
        .map(|i| approved_request(&format!("Player{i}")))
        .collect();
    for request in &requests {
        controller.on_connection_requested(request);
    }

    let decision = controller.on_start_game_attempt(|| panic!("start must not proceed"));
    assert_eq!(decision, StartDecision::Refused { connecting: 2 });
    assert_eq!(
        host.cancelled_starts.load(std::sync::atomic::Ordering::SeqCst),
        1
    );

    let mut now = Instant::now();
    for (i, _) in requests.iter().enumerate() {
        now = complete_one_admission(&controller, i as u64 + 1, now);
    }

    let mut started = false;
    let decision = controller.on_start_game_attempt(|| started = true);
    assert_eq!(decision, StartDecision::Proceeded);
    assert!(started);
    assert!(controller.is_landing());

    // Joins are rejected until the landing sequence completes.
    let late = approved_request("Late");
    controller.on_connection_requested(&late);
    assert_eq!(late.snapshot().reason, REASON_SHIP_LANDED);

    controller.on_landing_complete();
    let welcome = approved_request("Welcome");
    controller.on_connection_requested(&welcome);
    assert!(welcome.is_approved());
    assert!(welcome.is_pending());
}

proptest! {
    /// Regardless of whether each admission completes, times out, or drops,
    /// requests resolve strictly in arrival order and at most one admission
    /// is ever in flight.
    #[test]
    fn admissions_resolve_in_fifo_order(
        outcomes in proptest::collection::vec(0u8..3, 1..10)
    ) {
        let host = TestHost::hosting_lobby();
        let controller =
            AdmissionController::new(JoinQueueConfig::default(), host.clone());

        let requests: Vec<_> = (0..outcomes.len())
            .map(|i| approved_request(&format!("P{i}")))
            .collect();
        for request in &requests {
            controller.on_connection_requested(request);
        }

        let mut now = Instant::now();
        for (i, (outcome, request)) in outcomes.iter().zip(&requests).enumerate() {
            controller.tick(now);
            prop_assert!(controller.has_in_flight());
            prop_assert!(!request.is_pending());
            for later in &requests[i + 1..] {
                prop_assert!(later.is_pending());
            }

            let client_id = i as u64 + 1;
            controller.on_client_connect_low(client_id, now);
            match outcome {
                // Confirmed admission, then the grace delay.
                0 => {
                    controller.on_confirmation(ConfirmationKind::StateSync, client_id, now);
                    controller.on_confirmation(ConfirmationKind::IdentitySync, client_id, now);
                    prop_assert!(!controller.has_in_flight());
                    now += DELAY;
                }
                // Handshake timeout; forced disconnect frees the slot.
                1 => {
                    now += TIMEOUT;
                    controller.tick(now);
                    prop_assert!(!controller.has_in_flight());
                }
                // Voluntary disconnect mid-handshake, no grace delay.
                _ => {
                    controller.on_confirmation(ConfirmationKind::StateSync, client_id, now);
                    controller.on_disconnect(client_id);
                    prop_assert!(!controller.has_in_flight());
                }
            }
        }

        prop_assert_eq!(controller.queue_len(), 0);
        prop_assert!(controller.can_start());
    }
}
