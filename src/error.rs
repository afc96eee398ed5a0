//! Error types for the telemetry feed.

use thiserror::Error;

/// Errors that can occur while resolving, opening or reading the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The channel could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The channel failed after it was established.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A push message was not a valid snapshot.
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured origin is not a usable URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// This build or origin cannot carry the feed at all.
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),
}

impl FeedError {
    /// Whether retrying can never succeed for this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FeedError::UnsupportedEnvironment(_) | FeedError::InvalidEndpoint(_)
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for FeedError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::Io(e) => FeedError::Connect(e.to_string()),
            WsError::Url(e) => FeedError::UnsupportedEnvironment(e.to_string()),
            other => FeedError::Transport(other.to_string()),
        }
    }
}
