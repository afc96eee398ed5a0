//! Connection state machine.
//!
//! [`Lifecycle`] holds the connectivity state and the "reconnect pending"
//! flag, and turns channel signals into [`Effect`]s for the driver to carry
//! out. It performs no I/O and never sleeps, so every transition can be
//! exercised synchronously.
//!
//! ```text
//!               start / timer
//!  Disconnected ─────────────▶ Connecting ── open ──▶ Connected
//!        ▲                          │                     │
//!        └──────── close / closing error ─────────────────┘
//! ```

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ConnectivityState, FeedEvent};
use crate::source::Snapshot;

/// Fixed delay between losing the channel and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand an event to the consumer.
    Publish(FeedEvent),
    /// Open a new channel.
    OpenChannel,
    /// Arm the (single) reconnect timer.
    ScheduleReconnect(Duration),
}

/// The Disconnected/Connecting/Connected state machine.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: ConnectivityState,
    reconnect_delay: Duration,
    reconnect_pending: bool,
    last_error: Option<String>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}

impl Lifecycle {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectivityState::Disconnected,
            reconnect_delay,
            reconnect_pending: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    /// Whether a reconnect timer is currently armed.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// The most recent decode or transport error, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Begin connecting. No-op while a channel is open or being opened, or
    /// while a reconnect timer is armed.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.state != ConnectivityState::Disconnected || self.reconnect_pending {
            debug!(state = self.state.label(), "start ignored");
            return Vec::new();
        }
        self.transition(ConnectivityState::Connecting);
        vec![
            Effect::Publish(FeedEvent::Connectivity(ConnectivityState::Connecting)),
            Effect::OpenChannel,
        ]
    }

    /// The channel reported successful establishment.
    pub fn on_open(&mut self) -> Vec<Effect> {
        if self.state != ConnectivityState::Connecting {
            debug!(state = self.state.label(), "open ignored");
            return Vec::new();
        }
        self.transition(ConnectivityState::Connected);
        self.last_error = None;
        vec![Effect::Publish(FeedEvent::Connectivity(ConnectivityState::Connected))]
    }

    /// Decode one raw message. Bad payloads are logged and dropped.
    pub fn on_message(&mut self, raw: &str) -> Vec<Effect> {
        match Snapshot::decode(raw) {
            Ok(snapshot) => {
                debug!(
                    barrels = snapshot.barrel_details.as_ref().map_or(0, Vec::len),
                    "snapshot received"
                );
                vec![Effect::Publish(FeedEvent::Snapshot(snapshot))]
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed snapshot");
                self.last_error = Some(format!("Parse error: {}", e));
                Vec::new()
            }
        }
    }

    /// The channel closed, or could not be opened.
    pub fn on_close(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.state != ConnectivityState::Disconnected {
            self.transition(ConnectivityState::Disconnected);
            effects.push(Effect::Publish(FeedEvent::Connectivity(
                ConnectivityState::Disconnected,
            )));
        }

        if !self.reconnect_pending {
            self.reconnect_pending = true;
            info!(delay = ?self.reconnect_delay, "reconnect scheduled");
            effects.push(Effect::ScheduleReconnect(self.reconnect_delay));
        }

        effects
    }

    /// The channel reported an error. Only an error that took the channel
    /// down changes state.
    pub fn on_error(&mut self, message: &str, closed: bool) -> Vec<Effect> {
        self.last_error = Some(format!("Transport error: {}", message));
        if closed {
            warn!(error = message, "channel failed");
            self.on_close()
        } else {
            warn!(error = message, "channel error (channel still open)");
            Vec::new()
        }
    }

    /// The channel could not be opened. `message` is recorded as given.
    pub fn on_connect_failed(&mut self, message: &str) -> Vec<Effect> {
        debug!(error = message, "recording connect failure");
        self.last_error = Some(message.to_string());
        self.on_close()
    }

    /// The reconnect timer fired.
    pub fn on_reconnect_timer(&mut self) -> Vec<Effect> {
        self.reconnect_pending = false;
        self.start()
    }

    fn transition(&mut self, next: ConnectivityState) {
        info!(from = self.state.label(), to = next.label(), "connectivity changed");
        self.state = next;
    }
}
