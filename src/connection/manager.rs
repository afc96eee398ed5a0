//! Async driver for the connection [`Lifecycle`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{Channel, ChannelEvent, Effect, FeedEvent, Lifecycle, Transport};

/// What the driver does once a batch of effects has been applied.
#[derive(Debug, PartialEq)]
enum Next {
    Connect,
    Wait(Duration),
    Idle,
    Stop,
}

/// Owns the transport and the single open channel, and forwards decoded
/// snapshots and connectivity changes to its consumer in arrival order.
///
/// The manager runs until the consumer drops its receiver. It never gives up
/// on the feed by itself.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    lifecycle: Lifecycle,
    events: mpsc::Sender<FeedEvent>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T, reconnect_delay: Duration, events: mpsc::Sender<FeedEvent>) -> Self {
        Self {
            transport,
            lifecycle: Lifecycle::new(reconnect_delay),
            events,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the most recent decode or transport error.
    pub fn error_handle(&self) -> Arc<Mutex<Option<String>>> {
        self.last_error.clone()
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Run the connect / pump / wait loop.
    pub async fn run(mut self) {
        info!(endpoint = self.transport.endpoint(), "feed starting");
        let mut effects = self.lifecycle.start();

        loop {
            effects = match self.apply(effects).await {
                Next::Connect => match self.transport.connect().await {
                    Ok(channel) => {
                        let opened = self.lifecycle.on_open();
                        self.sync_error();
                        if self.apply(opened).await == Next::Stop {
                            break;
                        }
                        match self.pump(channel).await {
                            Some(closing) => closing,
                            None => break,
                        }
                    }
                    Err(e) => {
                        warn!(endpoint = self.transport.endpoint(), error = %e, "connect failed");
                        let closing = self.lifecycle.on_connect_failed(&e.to_string());
                        self.sync_error();
                        closing
                    }
                },
                Next::Wait(delay) => {
                    tokio::time::sleep(delay).await;
                    self.lifecycle.on_reconnect_timer()
                }
                Next::Idle => {
                    self.events.closed().await;
                    break;
                }
                Next::Stop => break,
            };
        }

        info!("feed consumer gone, stopping");
    }

    /// Read from an open channel until it goes away. Returns the effects of
    /// the closing transition, or `None` if the consumer left.
    async fn pump(&mut self, mut channel: T::Channel) -> Option<Vec<Effect>> {
        loop {
            let (effects, closed) = match channel.next_event().await {
                ChannelEvent::Message(raw) => (self.lifecycle.on_message(&raw), false),
                ChannelEvent::Error { message, closed } => {
                    (self.lifecycle.on_error(&message, closed), closed)
                }
                ChannelEvent::Closed => {
                    debug!("channel closed");
                    (self.lifecycle.on_close(), true)
                }
            };
            self.sync_error();

            if closed {
                return Some(effects);
            }
            if self.apply(effects).await == Next::Stop {
                return None;
            }
        }
    }

    /// Carry out effects and decide what to do next.
    async fn apply(&mut self, effects: Vec<Effect>) -> Next {
        let mut next = Next::Idle;
        for effect in effects {
            match effect {
                Effect::Publish(event) => {
                    if self.events.send(event).await.is_err() {
                        return Next::Stop;
                    }
                }
                Effect::OpenChannel => next = Next::Connect,
                Effect::ScheduleReconnect(delay) => next = Next::Wait(delay),
            }
        }
        next
    }

    /// Mirror the lifecycle's error slot, including clearing it.
    fn sync_error(&self) {
        *self.last_error.lock() = self.lifecycle.last_error().map(str::to_string);
    }
}
