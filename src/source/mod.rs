//! Data source abstraction for receiving telemetry.
//!
//! A source hands the TUI a sequence of [`FeedEvent`]s: decoded snapshots
//! and connectivity changes. The live source is backed by the
//! [`ConnectionManager`](crate::connection::ConnectionManager); the file
//! source replays a snapshot saved to disk.

mod feed;
mod file;
mod snapshot;

pub use feed::FeedSource;
pub use file::FileSource;
pub use snapshot::{BarrelRecord, Snapshot, TermCounts};

pub use crate::connection::{ConnectivityState, FeedEvent};

use std::fmt::Debug;

/// Trait for receiving telemetry from various sources.
///
/// # Example
///
/// ```
/// use barrelwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("stats.json");
/// while let Some(event) = source.poll() {
///     println!("{:?}", event);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next event.
    ///
    /// Returns `Some(event)` if one is waiting, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// The most recent error reported by the source, if any.
    fn error(&self) -> Option<String>;

    /// Whether the source can never deliver data (unsupported environment).
    fn is_fatal(&self) -> bool {
        false
    }
}
