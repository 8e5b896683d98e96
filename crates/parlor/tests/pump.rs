//! Integration tests for the event loop: exit paths and error
//! handling, driven over the in-process broker.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use parlor::{pump, Room};
use parlor_protocol::Command;
use parlor_transport::MemoryBroker;

type Channels = (
    mpsc::UnboundedSender<Command>,
    mpsc::UnboundedReceiver<Command>,
    mpsc::UnboundedReceiver<String>,
    Room<MemoryBroker>,
);

fn setup(broker: MemoryBroker) -> Channels {
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (identity_tx, _identity_rx) = watch::channel(String::new());
    let room = Room::new(broker, inbox_tx, identity_tx);
    (cmd_tx, cmd_rx, inbox_rx, room)
}

#[tokio::test]
async fn test_quit_tears_the_session_down() {
    let broker = MemoryBroker::new();
    let (cmd_tx, cmd_rx, inbox_rx, room) = setup(broker.clone());

    cmd_tx.send(Command::Enter("lobby".into())).unwrap();
    cmd_tx.send(Command::Quit).unwrap();

    let room = pump::run(room, inbox_rx, cmd_rx, std::future::pending()).await;

    assert!(!room.status().is_active());
    assert!(!room.has_subscription());
    assert!(broker.channels("lobby").await.is_empty());
}

#[tokio::test]
async fn test_termination_signal_exits_without_teardown() {
    let broker = MemoryBroker::new();
    let (cmd_tx, cmd_rx, inbox_rx, room) = setup(broker.clone());

    cmd_tx.send(Command::Enter("lobby".into())).unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(pump::run(room, inbox_rx, cmd_rx, async {
        let _ = stop_rx.await;
    }));

    // Let the enter command be served before signalling.
    while broker.channels("lobby").await.is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    stop_tx.send(()).unwrap();
    let room = handle.await.unwrap();

    // The session is left as-is; process exit cleans up.
    assert!(room.status().is_active());
    assert!(room.has_subscription());
    assert_eq!(broker.channels("lobby").await.len(), 1);

    // A command arriving after the loop has exited is never served.
    let _ = cmd_tx.send(Command::Enter("other".into()));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(broker.channels("other").await.is_empty());
}

#[tokio::test]
async fn test_closed_command_source_ends_the_loop() {
    let broker = MemoryBroker::new();
    let (cmd_tx, cmd_rx, inbox_rx, room) = setup(broker);

    drop(cmd_tx);
    let room = pump::run(room, inbox_rx, cmd_rx, std::future::pending()).await;
    assert!(!room.status().is_active());
}

#[tokio::test]
async fn test_operation_errors_keep_the_loop_alive() {
    let broker = MemoryBroker::new();
    let (cmd_tx, cmd_rx, inbox_rx, room) = setup(broker.clone());

    // say before enter fails, but the loop must keep serving commands.
    cmd_tx.send(Command::Say("hello?".into())).unwrap();
    cmd_tx.send(Command::Enter("lobby".into())).unwrap();
    cmd_tx.send(Command::Quit).unwrap();

    let _ = pump::run(room, inbox_rx, cmd_rx, std::future::pending()).await;

    // The enter after the failed say went through.
    assert_eq!(broker.publish_count().await, 0);
}

#[tokio::test]
async fn test_full_command_sequence() {
    let broker = MemoryBroker::new();
    let mut observer = broker.tap("lobby", "observer").await;
    let (cmd_tx, cmd_rx, inbox_rx, room) = setup(broker.clone());

    cmd_tx.send(Command::Register("alice".into())).unwrap();
    cmd_tx.send(Command::Enter("lobby".into())).unwrap();
    cmd_tx.send(Command::Say("good morning".into())).unwrap();
    cmd_tx.send(Command::Leave).unwrap();
    cmd_tx.send(Command::Quit).unwrap();

    let room = pump::run(room, inbox_rx, cmd_rx, std::future::pending()).await;

    assert_eq!(observer.recv().await.unwrap(), "(alice) says: good morning");
    assert!(!room.status().is_active());
    assert_eq!(room.user(), "alice");
    assert!(broker.channels("lobby").await.is_empty());
}
