//! Push-channel lifecycle for the telemetry feed.
//!
//! The feed is modelled as an abstract [`Transport`] that can open any number
//! of [`Channel`]s over its lifetime, one at a time. A channel yields
//! [`ChannelEvent`]s until it closes; the [`ConnectionManager`] then waits a
//! fixed delay and asks the transport for a fresh one.
//!
//! ```text
//!   ┌──────────────┐ OpenChannel  ┌───────────┐ ChannelEvent ┌───────────┐
//!   │  Lifecycle   │─────────────▶│ Transport │─────────────▶│ Lifecycle │
//!   │ (sans-IO FSM)│◀─────────────│ / Channel │              │  effects  │
//!   └──────────────┘ timer fired  └───────────┘              └─────┬─────┘
//!                                                                  │ FeedEvent
//!                                                                  ▼
//!                                                         mpsc ─▶ FeedSource
//! ```
//!
//! - [`lifecycle`]: the Disconnected/Connecting/Connected state machine
//! - [`manager`]: the async task that drives the state machine
//! - [`endpoint`]: feed URL resolution from the configured origin
//! - [`websocket`]: the WebSocket transport

pub mod endpoint;
pub mod lifecycle;
pub mod manager;
pub mod websocket;

pub use endpoint::FeedEndpoint;
pub use lifecycle::{Effect, Lifecycle, DEFAULT_RECONNECT_DELAY};
pub use manager::ConnectionManager;
pub use websocket::WebSocketTransport;

use async_trait::async_trait;

use crate::error::FeedError;
use crate::source::Snapshot;

/// Connectivity of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectivityState {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityState::Disconnected => "disconnected",
            ConnectivityState::Connecting => "connecting",
            ConnectivityState::Connected => "connected",
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == ConnectivityState::Connected
    }
}

/// What the feed hands to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A decoded snapshot, in arrival order.
    Snapshot(Snapshot),
    /// The channel changed connectivity.
    Connectivity(ConnectivityState),
}

/// One thing that happened on an open channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A text payload.
    Message(String),
    /// An error. `closed` tells whether the channel is gone afterwards.
    Error { message: String, closed: bool },
    /// The channel closed.
    Closed,
}

/// Something that can open push channels to the feed.
#[async_trait]
pub trait Transport: Send {
    type Channel: Channel;

    /// Open a new channel. Resolves once the channel is established.
    async fn connect(&mut self) -> Result<Self::Channel, FeedError>;

    /// Where this transport connects to, for display and logs.
    fn endpoint(&self) -> &str;
}

/// An open push channel.
#[async_trait]
pub trait Channel: Send {
    /// Wait for the next event. After `Closed` (or a closing error) the
    /// channel is not polled again.
    async fn next_event(&mut self) -> ChannelEvent;
}
