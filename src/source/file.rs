//! File-based data source.
//!
//! Replays a snapshot saved to disk (for example a capture of one push
//! message), re-reading it whenever the file is modified.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

use super::{ConnectivityState, DataSource, FeedEvent, Snapshot};

/// A data source that reads snapshots from a JSON file.
///
/// The file counts as "connected" while it can be read. If it disappears the
/// source reports a disconnect and the last view stays on screen; a file
/// that fails to parse is skipped like a malformed push message.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    connectivity: ConnectivityState,
    pending: VecDeque<FeedEvent>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            connectivity: ConnectivityState::Disconnected,
            pending: VecDeque::new(),
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file once.
    pub fn read_snapshot(&self) -> anyhow::Result<Snapshot> {
        let content = fs::read_to_string(&self.path)?;
        Ok(Snapshot::decode(&content)?)
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn set_connectivity(&mut self, state: ConnectivityState) {
        if self.connectivity != state {
            self.connectivity = state;
            self.pending.push_back(FeedEvent::Connectivity(state));
        }
    }

    fn refresh(&mut self) {
        let current_modified = self.get_modified_time();

        let file_changed = match (self.last_modified, current_modified) {
            (_, None) => {
                self.last_error = Some(format!("Read error: {} not found", self.path.display()));
                self.set_connectivity(ConnectivityState::Disconnected);
                self.last_modified = None;
                return;
            }
            (None, Some(_)) => true,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return;
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => {
                self.last_modified = current_modified;
                self.set_connectivity(ConnectivityState::Connected);
                match Snapshot::decode(&content) {
                    Ok(snapshot) => {
                        self.last_error = None;
                        self.pending.push_back(FeedEvent::Snapshot(snapshot));
                    }
                    Err(e) => {
                        warn!(path = %self.path.display(), error = %e, "skipping malformed snapshot file");
                        self.last_error = Some(format!("Parse error: {}", e));
                    }
                }
            }
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                self.set_connectivity(ConnectivityState::Disconnected);
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        if self.pending.is_empty() {
            self.refresh();
        }
        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
