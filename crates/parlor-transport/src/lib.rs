//! Bus abstraction layer for Parlor.
//!
//! The client core treats the message bus as an opaque service with
//! three capabilities: subscribe a channel to a topic, publish to a
//! topic, and tear either down. The [`Broker`], [`Subscription`], and
//! [`Publisher`] traits capture exactly that surface; everything else
//! about the bus (framing, acknowledgment, requeueing) stays behind it.
//!
//! Two implementations ship here:
//!
//! - [`WsBroker`] (default `websocket` feature) — talks to a bus
//!   endpoint over WebSocket.
//! - [`MemoryBroker`] — an in-process bus for tests and loopback runs.
//!
//! # Delivery contract
//!
//! A subscription is handed an `UnboundedSender<String>` (the inbox).
//! Every delivered message body is forwarded into it without blocking
//! the delivery path. If the inbox's reader is gone — the event loop
//! has exited — the forward fails and the delivery counts as a
//! processing failure; what the bus does with it (redeliver, drop) is
//! its own policy.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::{MemoryBroker, MemoryPublisher, MemorySubscription};
#[cfg(feature = "websocket")]
pub use websocket::{WsBroker, WsPublisher, WsSubscription};

use tokio::sync::mpsc;

/// A handle to the bus: opens subscriptions and publish connections.
pub trait Broker: Send + Sync + 'static {
    /// The subscription type produced by this broker.
    type Subscription: Subscription;
    /// The publisher type produced by this broker.
    type Publisher: Publisher;

    /// Registers `channel` as a subscriber group on `topic` and wires
    /// delivered message bodies into `inbox`.
    async fn subscribe(
        &self,
        topic: &str,
        channel: &str,
        inbox: mpsc::UnboundedSender<String>,
    ) -> Result<Self::Subscription, TransportError>;

    /// Opens a publish connection to the bus.
    async fn publisher(&self) -> Result<Self::Publisher, TransportError>;
}

/// An active subscription. Dropping it without [`stop`](Self::stop)
/// leaves teardown to the connection's own lifecycle.
pub trait Subscription: Send + 'static {
    /// Stops delivery and withdraws the channel registration.
    async fn stop(self);
}

/// An open publish connection, reusable across publishes.
pub trait Publisher: Send + 'static {
    /// Publishes `body` to `topic`.
    async fn publish(&mut self, topic: &str, body: &str) -> Result<(), TransportError>;

    /// Closes the publish connection.
    async fn stop(self);
}
