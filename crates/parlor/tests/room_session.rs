//! Integration tests for the room state machine over the in-process
//! broker.

use parlor::{prompt, Room, RoomError};
use parlor_transport::{Broker, MemoryBroker, Publisher};
use tokio::sync::{mpsc, watch};

fn new_room(
    broker: MemoryBroker,
) -> (
    Room<MemoryBroker>,
    mpsc::UnboundedReceiver<String>,
    watch::Receiver<String>,
) {
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (identity_tx, identity_rx) = watch::channel(String::new());
    (Room::new(broker, inbox_tx, identity_tx), inbox_rx, identity_rx)
}

#[tokio::test]
async fn test_subscription_exists_iff_active() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    assert!(!room.status().is_active());
    assert!(!room.has_subscription());

    room.enter("lobby").await.unwrap();
    assert!(room.status().is_active());
    assert!(room.has_subscription());
    assert_eq!(room.topic(), "lobby");
    assert_eq!(broker.channels("lobby").await.len(), 1);

    room.leave().await;
    assert!(!room.status().is_active());
    assert!(!room.has_subscription());
    assert!(broker.channels("lobby").await.is_empty());
}

#[tokio::test]
async fn test_leave_is_idempotent() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    room.enter("lobby").await.unwrap();
    room.leave().await;
    let after_first = (room.status(), room.has_subscription(), room.has_publisher());

    room.leave().await;
    let after_second = (room.status(), room.has_subscription(), room.has_publisher());

    assert_eq!(after_first, after_second);
    assert!(!room.status().is_active());
}

#[tokio::test]
async fn test_leave_without_enter_is_a_no_op() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker);
    room.leave().await;
    assert!(!room.status().is_active());
}

#[tokio::test]
async fn test_say_while_inactive_never_contacts_the_bus() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    let result = room.say("hi").await;
    assert!(matches!(result, Err(RoomError::NotActive)));

    assert_eq!(broker.publisher_handles().await, 0);
    assert_eq!(broker.publish_count().await, 0);
    assert!(!room.has_publisher());
}

#[tokio::test]
async fn test_enter_while_active_keeps_existing_session() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    room.enter("lobby").await.unwrap();
    let original = broker.channels("lobby").await;

    let result = room.enter("other").await;
    assert!(matches!(result, Err(RoomError::AlreadyActive)));

    assert_eq!(room.topic(), "lobby");
    assert_eq!(broker.channels("lobby").await, original);
    assert!(broker.channels("other").await.is_empty());
}

#[tokio::test]
async fn test_publisher_created_once_per_session_and_reused() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    room.enter("lobby").await.unwrap();
    room.register("bob".into());

    room.say("first").await.unwrap();
    room.say("second").await.unwrap();

    assert_eq!(broker.publisher_handles().await, 1);
    assert_eq!(broker.publish_count().await, 2);
}

#[tokio::test]
async fn test_say_payload_format() {
    let broker = MemoryBroker::new();
    let mut observer = broker.tap("lobby", "observer").await;
    let (mut room, mut inbox, _id) = new_room(broker.clone());

    room.enter("lobby").await.unwrap();
    room.register("bob".into());
    room.say("hi").await.unwrap();

    assert_eq!(observer.recv().await.unwrap(), "(bob) says: hi");
    // The room's own subscription gets the copy too.
    assert_eq!(inbox.recv().await.unwrap(), "(bob) says: hi");
}

#[tokio::test]
async fn test_reenter_after_leave_gets_a_fresh_channel() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker.clone());

    room.register("alice".into());
    room.enter("room1").await.unwrap();
    let first = broker.channels("room1").await;

    room.leave().await;
    room.enter("room1").await.unwrap();
    let second = broker.channels("room1").await;

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first[0], second[0], "channel ids must not be reused");
}

#[tokio::test]
async fn test_delivery_round_trip_is_unaltered() {
    let broker = MemoryBroker::new();
    let (mut room, mut inbox, _id) = new_room(broker.clone());

    room.enter("lobby").await.unwrap();

    // Another participant publishes directly to the topic.
    let mut publisher = broker.publisher().await.unwrap();
    publisher.publish("lobby", "hello").await.unwrap();

    let body = inbox.recv().await.unwrap();
    assert_eq!(body, "hello");
    assert!(prompt::room_line(&body).contains("hello"));
}

#[tokio::test]
async fn test_register_is_unconditional_and_last_write_wins() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, identity) = new_room(broker);

    assert_eq!(room.user(), "");
    room.register("alice".into());
    room.register("bob".into());
    assert_eq!(room.user(), "bob");
    assert_eq!(*identity.borrow(), "bob");
}

#[tokio::test]
async fn test_display_name_survives_enter_leave_cycles() {
    let broker = MemoryBroker::new();
    let (mut room, _inbox, _id) = new_room(broker);

    room.register("alice".into());
    room.enter("room1").await.unwrap();
    room.leave().await;
    room.enter("room2").await.unwrap();

    assert_eq!(room.user(), "alice");
}
