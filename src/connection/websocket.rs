//! WebSocket transport for the stats feed.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::{Channel, ChannelEvent, FeedEndpoint, Transport};
use crate::error::FeedError;

/// Opens WebSocket connections to a resolved feed endpoint.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    endpoint: FeedEndpoint,
}

impl WebSocketTransport {
    pub fn new(endpoint: FeedEndpoint) -> Self {
        if endpoint.is_secure() {
            install_crypto_provider();
        }
        Self { endpoint }
    }
}

/// rustls needs a process-wide crypto provider before the first handshake.
#[cfg(feature = "tls")]
fn install_crypto_provider() {
    // Err means a provider is already installed
    if rustls::crypto::ring::default_provider().install_default().is_ok() {
        debug!("installed ring crypto provider");
    }
}

#[cfg(not(feature = "tls"))]
fn install_crypto_provider() {}

#[async_trait]
impl Transport for WebSocketTransport {
    type Channel = WebSocketChannel;

    async fn connect(&mut self) -> Result<WebSocketChannel, FeedError> {
        debug!(url = self.endpoint.as_str(), "opening websocket");
        let (stream, response) = connect_async(self.endpoint.as_str()).await?;
        info!(
            url = self.endpoint.as_str(),
            status = %response.status(),
            "websocket connected"
        );
        Ok(WebSocketChannel { stream })
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

/// One open WebSocket connection.
pub struct WebSocketChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Channel for WebSocketChannel {
    async fn next_event(&mut self) -> ChannelEvent {
        loop {
            match self.stream.next().await {
                None => return ChannelEvent::Closed,
                Some(Ok(Message::Text(text))) => return ChannelEvent::Message(text),
                Some(Ok(Message::Binary(bytes))) => {
                    return match String::from_utf8(bytes) {
                        Ok(text) => ChannelEvent::Message(text),
                        Err(e) => ChannelEvent::Error {
                            message: format!("binary frame is not UTF-8: {}", e),
                            closed: false,
                        },
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "close frame received");
                    return ChannelEvent::Closed;
                }
                // Ping/pong replies are handled by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    let closed = !matches!(e, WsError::Utf8);
                    return ChannelEvent::Error {
                        message: e.to_string(),
                        closed,
                    };
                }
            }
        }
    }
}
