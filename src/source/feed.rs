//! Live push-feed data source.
//!
//! Receives [`FeedEvent`]s from a [`ConnectionManager`] task over an mpsc
//! channel, so snapshots reach the TUI strictly in arrival order.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{DataSource, FeedEvent};
use crate::connection::{ConnectionManager, Transport};

/// Buffered events between the feed task and the TUI.
const EVENT_BUFFER: usize = 64;

/// A data source fed by a background connection manager.
///
/// # Example
///
/// ```
/// use barrelwatch::{DataSource, FeedEvent, FeedSource, ConnectivityState};
/// use tokio::sync::mpsc;
///
/// # tokio_test::block_on(async {
/// let (tx, rx) = mpsc::channel(16);
/// let mut source = FeedSource::from_receiver(rx, "test");
/// tx.send(FeedEvent::Connectivity(ConnectivityState::Connected)).await.unwrap();
/// assert!(source.poll().is_some());
/// # });
/// ```
#[derive(Debug)]
pub struct FeedSource {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    fatal: bool,
}

impl FeedSource {
    /// Spawn a connection manager for `transport` on the current runtime.
    pub fn spawn<T>(transport: T, reconnect_delay: Duration) -> Self
    where
        T: Transport + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let manager = ConnectionManager::new(transport, reconnect_delay, tx);
        let description = format!("feed: {}", manager.endpoint());
        let last_error = manager.error_handle();

        tokio::spawn(manager.run());

        Self {
            receiver: rx,
            description,
            last_error,
            fatal: false,
        }
    }

    /// Wrap an existing event channel.
    ///
    /// Useful when events are produced by something other than a
    /// [`ConnectionManager`], such as tests or a replay tool.
    pub fn from_receiver(receiver: mpsc::Receiver<FeedEvent>, description: &str) -> Self {
        Self {
            receiver,
            description: format!("feed: {}", description),
            last_error: Arc::new(Mutex::new(None)),
            fatal: false,
        }
    }

    /// A source for an environment that cannot carry the feed at all.
    ///
    /// No connection is ever attempted; the reason is reported as a fatal
    /// error.
    pub fn unsupported(reason: &str) -> Self {
        let (_, rx) = mpsc::channel(1);
        Self {
            receiver: rx,
            description: "feed: unavailable".to_string(),
            last_error: Arc::new(Mutex::new(Some(reason.to_string()))),
            fatal: true,
        }
    }
}

impl DataSource for FeedSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if !self.fatal {
                    *self.last_error.lock() = Some("Feed task stopped".to_string());
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn is_fatal(&self) -> bool {
        self.fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectivityState;
    use crate::source::Snapshot;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, rx) = mpsc::channel(16);
        let mut source = FeedSource::from_receiver(rx, "test");

        tx.send(FeedEvent::Connectivity(ConnectivityState::Connected)).await.unwrap();
        for n in 0..3u64 {
            let snapshot = Snapshot::decode(&format!(r#"{{"topSearchTerms":{{"n":{}}}}}"#, n)).unwrap();
            tx.send(FeedEvent::Snapshot(snapshot)).await.unwrap();
        }

        assert_eq!(
            source.poll(),
            Some(FeedEvent::Connectivity(ConnectivityState::Connected))
        );
        for n in 0..3u64 {
            match source.poll() {
                Some(FeedEvent::Snapshot(s)) => {
                    assert_eq!(s.top_search_terms.unwrap().0[0].1, n);
                }
                other => panic!("expected snapshot {}, got {:?}", n, other),
            }
        }
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_description() {
        let (_tx, rx) = mpsc::channel(1);
        let source = FeedSource::from_receiver(rx, "ws://localhost:8080/stats");
        assert_eq!(source.description(), "feed: ws://localhost:8080/stats");
    }

    #[tokio::test]
    async fn test_stopped_feed_reports_error() {
        let (tx, rx) = mpsc::channel(1);
        let mut source = FeedSource::from_receiver(rx, "test");
        drop(tx);

        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("Feed task stopped"));
        assert!(!source.is_fatal());
    }

    #[test]
    fn test_unsupported_source() {
        let mut source = FeedSource::unsupported("origin scheme `ftp` cannot carry the stats feed");
        assert!(source.poll().is_none());
        assert!(source.is_fatal());
        assert!(source.error().unwrap().contains("ftp"));
    }
}
