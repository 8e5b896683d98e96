//! The room state machine.
//!
//! One [`Room`] exists per process and lives as long as the event
//! loop: single instance, single membership — concurrent multi-room
//! presence is deliberately impossible. The subscription and publisher
//! handles are owned exclusively here and only ever touched from the
//! event-loop task, so no locking is needed around any of this state.

use tokio::sync::{mpsc, watch};

use parlor_transport::{Broker, Publisher, Subscription, TransportError};

/// Membership status. Governs which commands are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    /// Not in any room.
    #[default]
    Inactive,
    /// Joined a room; the subscription is live.
    Active,
}

impl RoomStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Errors from room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// `enter` while already in a room.
    #[error("already in a room, leave first")]
    AlreadyActive,

    /// `say` while not in a room.
    #[error("not in a room, enter one first")]
    NotActive,

    /// The bus refused or failed the operation.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The aggregate session state: membership, identity, and the bus
/// handles for the current session.
///
/// Invariants: `subscription` is `Some` iff the status is `Active`;
/// at most one subscription and one publisher exist at any instant.
/// The inbox sender always exists, even while inactive — it just has
/// no writer registered until the next `enter`.
pub struct Room<B: Broker> {
    broker: B,
    status: RoomStatus,
    topic: String,
    user: String,
    subscription: Option<B::Subscription>,
    publisher: Option<B::Publisher>,
    /// Cloned into every subscription as the delivery target.
    inbox: mpsc::UnboundedSender<String>,
    /// Pushes display-name changes to the prompt renderer.
    identity: watch::Sender<String>,
}

impl<B: Broker> Room<B> {
    /// Creates the room in the `Inactive` state. Called once, before
    /// the event loop starts.
    pub fn new(
        broker: B,
        inbox: mpsc::UnboundedSender<String>,
        identity: watch::Sender<String>,
    ) -> Self {
        Self {
            broker,
            status: RoomStatus::Inactive,
            topic: String::new(),
            user: String::new(),
            subscription: None,
            publisher: None,
            inbox,
            identity,
        }
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// The currently joined topic. Meaningful only while active.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The registered display name (empty until `register`).
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn has_publisher(&self) -> bool {
        self.publisher.is_some()
    }

    /// Joins `topic`: opens a subscription under a fresh subscriber
    /// channel and flips the status to `Active`.
    ///
    /// On failure nothing is retained — the status stays `Inactive`
    /// and the error surfaces to the caller for display.
    pub async fn enter(&mut self, topic: &str) -> Result<(), RoomError> {
        if self.status.is_active() {
            return Err(RoomError::AlreadyActive);
        }

        let channel = subscriber_channel(topic);
        tracing::debug!(topic, channel = %channel, "entering room");

        let subscription = self
            .broker
            .subscribe(topic, &channel, self.inbox.clone())
            .await?;

        self.subscription = Some(subscription);
        self.status = RoomStatus::Active;
        self.topic = topic.to_string();
        Ok(())
    }

    /// Leaves the current room. Idempotent and infallible: stops and
    /// clears whichever handles exist, then marks the room inactive.
    pub async fn leave(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.stop().await;
        }
        if let Some(publisher) = self.publisher.take() {
            publisher.stop().await;
        }
        self.status = RoomStatus::Inactive;
    }

    /// Publishes `"(<name>) says: <text>"` to the current topic.
    ///
    /// The publisher is created lazily on first use and reused for the
    /// rest of the session. A failed publish keeps the handle and the
    /// session — transient bus trouble does not force a re-enter.
    pub async fn say(&mut self, text: &str) -> Result<(), RoomError> {
        if !self.status.is_active() {
            return Err(RoomError::NotActive);
        }

        if self.publisher.is_none() {
            self.publisher = Some(self.broker.publisher().await?);
        }
        if let Some(publisher) = self.publisher.as_mut() {
            let line = format!("({}) says: {}", self.user, text);
            publisher.publish(&self.topic, &line).await?;
        }
        Ok(())
    }

    /// Sets the display name. Legal in any state; last write wins.
    pub fn register(&mut self, name: String) {
        self.user = name;
        // No receivers just means nothing currently renders a prompt.
        let _ = self.identity.send(self.user.clone());
    }
}

/// Builds a subscriber-channel name unique to this session:
/// `<topic>_<host><6 random digits>`. Independent processes joining
/// the same topic land in different channels, so each gets its own
/// copy of every message.
fn subscriber_channel(topic: &str) -> String {
    use rand::Rng;

    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("{topic}_{host}{suffix:06}")
}
