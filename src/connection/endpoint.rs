//! Feed URL resolution.
//!
//! The feed lives at a fixed path on the same host as the web front end.
//! Its transport security mirrors the origin: an `https` origin is always
//! reached over `wss`, an `http` origin over `ws`.

use url::Url;

use crate::error::FeedError;

/// Default path of the stats feed on the origin.
pub const DEFAULT_FEED_PATH: &str = "/stats";

/// A resolved feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoint {
    url: Url,
}

impl FeedEndpoint {
    /// Resolve the feed URL for `origin` (e.g. `https://search.example.org`).
    ///
    /// Fails with [`FeedError::UnsupportedEnvironment`] when the origin's
    /// scheme has no WebSocket counterpart, or when it needs TLS and this
    /// build has none.
    pub fn resolve(origin: &str, path: &str) -> Result<Self, FeedError> {
        let origin = Url::parse(origin)?;

        let scheme = match origin.scheme() {
            "http" => "ws",
            "https" if cfg!(feature = "tls") => "wss",
            "https" => {
                return Err(FeedError::UnsupportedEnvironment(
                    "https origin requires a build with the `tls` feature".to_string(),
                ))
            }
            other => {
                return Err(FeedError::UnsupportedEnvironment(format!(
                    "origin scheme `{}` cannot carry the stats feed (use http or https)",
                    other
                )))
            }
        };

        let host = origin.host_str().ok_or_else(|| {
            FeedError::UnsupportedEnvironment(format!("origin `{}` has no host", origin))
        })?;

        let authority = match origin.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let url = Url::parse(&format!("{}://{}{}", scheme, authority, path))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "wss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_origin_uses_ws() {
        let endpoint = FeedEndpoint::resolve("http://localhost:8080", DEFAULT_FEED_PATH).unwrap();
        assert_eq!(endpoint.as_str(), "ws://localhost:8080/stats");
        assert!(!endpoint.is_secure());
    }

    #[cfg(feature = "tls")]
    #[test]
    fn test_secure_origin_uses_wss() {
        let endpoint = FeedEndpoint::resolve("https://search.example.org", "/stats").unwrap();
        assert_eq!(endpoint.as_str(), "wss://search.example.org/stats");
        assert!(endpoint.is_secure());
    }

    #[cfg(not(feature = "tls"))]
    #[test]
    fn test_secure_origin_without_tls_is_unsupported() {
        let err = FeedEndpoint::resolve("https://search.example.org", "/stats").unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedEnvironment(_)));
    }

    #[test]
    fn test_origin_path_is_replaced() {
        let endpoint = FeedEndpoint::resolve("http://example.org/search?q=x", "stats").unwrap();
        assert_eq!(endpoint.as_str(), "ws://example.org/stats");
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = FeedEndpoint::resolve("ftp://example.org", "/stats").unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedEnvironment(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_origin() {
        let err = FeedEndpoint::resolve("not a url", "/stats").unwrap_err();
        assert!(matches!(err, FeedError::InvalidEndpoint(_)));
    }
}
