//! Integration tests for notification registration and cancellation.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;

use common::{wait_for, RecordingClient};
use herald::delivery::PushMessage;
use herald::scheduler::{NotificationRequest, NotificationScheduler, SchedulerConfig};

fn request_due_in_ms(ms: i64) -> NotificationRequest {
    NotificationRequest::single(
        PushMessage::to_token("token-a"),
        Utc::now() + chrono::Duration::milliseconds(ms),
    )
}

#[tokio::test]
async fn test_ids_are_unique_and_every_entry_drains() {
    let client = RecordingClient::new();
    let (scheduler, dispatcher) = NotificationScheduler::start(
        client.clone(),
        SchedulerConfig {
            max_in_flight: 8,
            handoff_capacity: 1,
        },
    );
    tokio::spawn(dispatcher.run());

    let mut ids = HashSet::new();
    for _ in 0..100 {
        assert!(ids.insert(scheduler.add(request_due_in_ms(50))));
    }
    assert_eq!(ids.len(), 100);

    // every registration is eventually dispatched and unregistered
    assert!(
        wait_for(Duration::from_secs(5), || scheduler.is_empty()
            && client.sent_count() == 100)
        .await
    );
}

#[tokio::test]
async fn test_concurrent_adds_never_collide() {
    let client = RecordingClient::new();
    let (scheduler, dispatcher) = NotificationScheduler::start(
        client.clone(),
        SchedulerConfig {
            max_in_flight: 8,
            handoff_capacity: 1,
        },
    );
    tokio::spawn(dispatcher.run());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                (0..25)
                    .map(|_| scheduler.add(request_due_in_ms(50)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for batch in futures::future::join_all(handles).await {
        for id in batch.expect("add task panicked") {
            assert!(ids.insert(id));
        }
    }
    assert_eq!(ids.len(), 200);

    assert!(wait_for(Duration::from_secs(5), || scheduler.is_empty()).await);
    assert_eq!(client.sent_count(), 200);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let (scheduler, _dispatcher) = NotificationScheduler::start(
        RecordingClient::new(),
        SchedulerConfig {
            max_in_flight: 8,
            handoff_capacity: 1,
        },
    );

    let id = scheduler.add(request_due_in_ms(60_000));
    assert!(scheduler.contains(&id));

    assert!(scheduler.remove(&id));
    assert!(!scheduler.remove(&id));
    assert!(!scheduler.contains(&id));
}

#[tokio::test]
async fn test_remove_unknown_id_is_a_no_op() {
    let (scheduler, _dispatcher) = NotificationScheduler::start(
        RecordingClient::new(),
        SchedulerConfig {
            max_in_flight: 8,
            handoff_capacity: 1,
        },
    );

    assert!(!scheduler.remove("no-such-notification"));
}

#[tokio::test]
async fn test_cancelled_notification_is_still_delivered() {
    // Cancellation is bookkeeping only: a waiter that already holds the
    // record proceeds to delivery, and the dispatcher's final removal is
    // a no-op.
    let client = RecordingClient::new();
    let (scheduler, dispatcher) = NotificationScheduler::start(
        client.clone(),
        SchedulerConfig {
            max_in_flight: 4,
            handoff_capacity: 1,
        },
    );
    tokio::spawn(dispatcher.run());

    let id = scheduler.add(request_due_in_ms(300));
    assert!(scheduler.remove(&id));
    assert!(scheduler.is_empty());

    assert!(wait_for(Duration::from_secs(2), || client.sent_count() == 1).await);
}

#[tokio::test]
async fn test_accepted_handoff_flips_the_completion_flag() {
    let client = RecordingClient::new();
    let (scheduler, dispatcher) = NotificationScheduler::start(
        client.clone(),
        SchedulerConfig {
            max_in_flight: 4,
            handoff_capacity: 1,
        },
    );
    tokio::spawn(dispatcher.run());

    let id = scheduler.add(request_due_in_ms(150));
    let record = scheduler.get(&id).expect("registered");
    assert!(!record.is_completed());

    assert!(wait_for(Duration::from_secs(2), || record.is_completed()).await);
    assert!(wait_for(Duration::from_secs(2), || scheduler.is_empty()).await);
}

#[tokio::test]
async fn test_waiters_are_tracked_until_done() {
    let client = RecordingClient::new();
    let (scheduler, dispatcher) = NotificationScheduler::start(
        client.clone(),
        SchedulerConfig {
            max_in_flight: 4,
            handoff_capacity: 1,
        },
    );
    tokio::spawn(dispatcher.run());

    scheduler.add(request_due_in_ms(200));
    assert_eq!(scheduler.pending_waiters(), 1);

    assert!(wait_for(Duration::from_secs(2), || scheduler.pending_waiters() == 0).await);
    assert!(wait_for(Duration::from_secs(2), || scheduler.is_empty()).await);
    assert_eq!(client.sent_count(), 1);
}
