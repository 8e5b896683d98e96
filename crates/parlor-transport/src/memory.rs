//! In-process broker.
//!
//! A topic → channel → inbox map behind a shared `Mutex`. Each channel
//! registered on a topic receives its own copy of every published
//! message, which is the subscriber-group model: independent sessions
//! subscribe under distinct channel names and none of them steal each
//! other's deliveries.
//!
//! Used by the test suites and for loopback runs; it also exposes a
//! few counters so tests can assert what the core did (or carefully
//! did not do) to the bus.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::{Broker, Publisher, Subscription, TransportError};

#[derive(Default)]
struct Inner {
    /// topic → (channel → inbox sender).
    topics: HashMap<String, HashMap<String, mpsc::UnboundedSender<String>>>,
    publishers_created: usize,
    publish_count: usize,
}

/// An in-process [`Broker`]. Cheap to clone; all clones share state.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel names currently registered on `topic`.
    pub async fn channels(&self, topic: &str) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .topics
            .get(topic)
            .map(|chans| chans.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// How many publish connections have been opened on this broker.
    pub async fn publisher_handles(&self) -> usize {
        self.inner.lock().await.publishers_created
    }

    /// How many publishes this broker has carried.
    pub async fn publish_count(&self) -> usize {
        self.inner.lock().await.publish_count
    }

    /// Registers an observer channel on `topic` and returns its
    /// receiving end. Tests use this to watch what gets published.
    pub async fn tap(&self, topic: &str, channel: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().await;
        inner
            .topics
            .entry(topic.to_string())
            .or_default()
            .insert(channel.to_string(), tx);
        rx
    }
}

impl Broker for MemoryBroker {
    type Subscription = MemorySubscription;
    type Publisher = MemoryPublisher;

    async fn subscribe(
        &self,
        topic: &str,
        channel: &str,
        inbox: mpsc::UnboundedSender<String>,
    ) -> Result<MemorySubscription, TransportError> {
        let mut inner = self.inner.lock().await;
        inner
            .topics
            .entry(topic.to_string())
            .or_default()
            .insert(channel.to_string(), inbox);
        tracing::debug!(topic, channel, "memory broker: channel registered");
        Ok(MemorySubscription {
            inner: Arc::clone(&self.inner),
            topic: topic.to_string(),
            channel: channel.to_string(),
        })
    }

    async fn publisher(&self) -> Result<MemoryPublisher, TransportError> {
        let mut inner = self.inner.lock().await;
        inner.publishers_created += 1;
        Ok(MemoryPublisher {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// A registration on the in-process broker.
pub struct MemorySubscription {
    inner: Arc<Mutex<Inner>>,
    topic: String,
    channel: String,
}

impl Subscription for MemorySubscription {
    async fn stop(self) {
        let mut inner = self.inner.lock().await;
        if let Some(chans) = inner.topics.get_mut(&self.topic) {
            chans.remove(&self.channel);
            if chans.is_empty() {
                inner.topics.remove(&self.topic);
            }
        }
        tracing::debug!(
            topic = %self.topic,
            channel = %self.channel,
            "memory broker: channel withdrawn"
        );
    }
}

/// A publish handle on the in-process broker.
pub struct MemoryPublisher {
    inner: Arc<Mutex<Inner>>,
}

impl Publisher for MemoryPublisher {
    async fn publish(&mut self, topic: &str, body: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner.publish_count += 1;
        if let Some(chans) = inner.topics.get_mut(topic) {
            // A dead inbox means that subscriber's reader is gone; the
            // delivery fails for that channel only.
            chans.retain(|channel, tx| {
                let alive = tx.send(body.to_string()).is_ok();
                if !alive {
                    tracing::debug!(topic, channel, "dropping channel with no reader");
                }
                alive
            });
        }
        Ok(())
    }

    async fn stop(self) {}
}
