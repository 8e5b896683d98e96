//! WebSocket broker client using `tokio-tungstenite`.
//!
//! Each subscription and each publisher is its own connection to the
//! bus endpoint. A subscription sends one `Subscribe` frame and then
//! runs a reader task that forwards every `Deliver` body into the
//! inbox; a publisher sends a `Publish` frame per message.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use parlor_protocol::{Codec, Frame, JsonCodec};

use crate::{Broker, Publisher, Subscription, TransportError};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A [`Broker`] that dials a bus endpoint over WebSocket.
pub struct WsBroker {
    addr: String,
    codec: JsonCodec,
}

impl WsBroker {
    /// Creates a broker for the endpoint at `addr` (host:port).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            codec: JsonCodec,
        }
    }

    async fn dial(&self) -> Result<WsStream, TransportError> {
        let url = format!("ws://{}", self.addr);
        let (ws, _) = tokio_tungstenite::connect_async(&url).await.map_err(|e| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;
        tracing::debug!(addr = %self.addr, "connected to bus");
        Ok(ws)
    }
}

impl Broker for WsBroker {
    type Subscription = WsSubscription;
    type Publisher = WsPublisher;

    async fn subscribe(
        &self,
        topic: &str,
        channel: &str,
        inbox: mpsc::UnboundedSender<String>,
    ) -> Result<WsSubscription, TransportError> {
        let mut ws = self.dial().await?;

        let frame = Frame::Subscribe {
            topic: topic.to_string(),
            channel: channel.to_string(),
        };
        let bytes = self.codec.encode(&frame)?;
        ws.send(Message::Binary(bytes.into())).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })?;

        let (write, mut read) = ws.split();
        let codec = self.codec;
        let reader = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                let data = match msg {
                    Ok(Message::Binary(data)) => data,
                    Ok(Message::Text(text)) => text.as_bytes().to_vec().into(),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue, // ping/pong/frame
                    Err(e) => {
                        tracing::debug!(error = %e, "subscription read error");
                        break;
                    }
                };
                match codec.decode::<Frame>(&data) {
                    Ok(Frame::Deliver { body, .. }) => {
                        if inbox.send(body).is_err() {
                            // No reader left on the inbox: the event
                            // loop has exited. The delivery fails and
                            // the bus applies its own redelivery policy.
                            tracing::debug!("inbox reader gone, stopping delivery");
                            break;
                        }
                    }
                    Ok(other) => {
                        tracing::debug!(?other, "ignoring non-delivery frame");
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to decode frame");
                    }
                }
            }
        });

        Ok(WsSubscription { write, reader })
    }

    async fn publisher(&self) -> Result<WsPublisher, TransportError> {
        let ws = self.dial().await?;
        Ok(WsPublisher {
            ws,
            codec: self.codec,
        })
    }
}

/// An active WebSocket subscription: the write half for teardown plus
/// the delivery-forwarding task.
pub struct WsSubscription {
    write: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
}

impl Subscription for WsSubscription {
    async fn stop(mut self) {
        let _ = self.write.send(Message::Close(None)).await;
        self.reader.abort();
    }
}

/// An open publish connection.
pub struct WsPublisher {
    ws: WsStream,
    codec: JsonCodec,
}

impl Publisher for WsPublisher {
    async fn publish(&mut self, topic: &str, body: &str) -> Result<(), TransportError> {
        let frame = Frame::Publish {
            topic: topic.to_string(),
            body: body.to_string(),
        };
        let bytes = self.codec.encode(&frame)?;
        self.ws
            .send(Message::Binary(bytes.into()))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    async fn stop(mut self) {
        let _ = self.ws.close(None).await;
    }
}
