// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # barrelwatch
//!
//! A live terminal dashboard and library for the statistics feed of a
//! distributed search engine.
//!
//! The search front end pushes a JSON snapshot over a WebSocket every time
//! its statistics change: the most searched terms, the most consulted URLs
//! and the state of every index barrel. This crate keeps that push channel
//! alive, reconnecting after a fixed delay whenever it drops, and turns each
//! snapshot into a display-ready view model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(view model)   │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐    ┌────────────┐                              │
//! │  │ source  │◀───│ connection │◀── WebSocket /stats          │
//! │  │ (input) │    │ (lifecycle)│                              │
//! │  └─────────┘    └────────────┘                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`connection`]**: the Disconnected/Connecting/Connected state machine,
//!   the task that drives it, and the WebSocket transport
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with the
//!   live [`FeedSource`] and a replaying [`FileSource`]
//! - **[`data`]**: the pure snapshot to [`ViewModel`] transformation
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Follow the feed of a local front end
//! barrelwatch --origin http://localhost:8080
//!
//! # Replay a captured snapshot
//! barrelwatch --file stats.json
//! ```
//!
//! ### Building a view model
//!
//! ```
//! use barrelwatch::{Snapshot, ViewModel};
//!
//! let snapshot = Snapshot::decode(
//!     r#"{"topSearchTerms":{"porto":25,"lisboa":40},
//!         "barrelDetails":[{"name":"B1","status":"Active","avgResponseTime":12.345}]}"#,
//! ).unwrap();
//!
//! let view = ViewModel::from_snapshot(&snapshot);
//! assert_eq!(view.top_terms[0].key, "lisboa");
//! assert_eq!(view.barrel_cards[0].label, "ATIVO");
//! assert_eq!(view.barrel_cards[0].latency, "12.3");
//! ```
//!
//! ### As a library with the live feed
//!
//! ```no_run
//! use std::time::Duration;
//! use barrelwatch::{App, FeedEndpoint, FeedSource, WebSocketTransport};
//!
//! # tokio_test::block_on(async {
//! let endpoint = FeedEndpoint::resolve("http://localhost:8080", "/stats").unwrap();
//! let source = FeedSource::spawn(WebSocketTransport::new(endpoint), Duration::from_secs(2));
//! let app = App::new(Box::new(source));
//! # });
//! ```
//!
//! ### Driving the state machine by hand
//!
//! ```
//! use barrelwatch::{ConnectivityState, Effect, FeedEvent, Lifecycle};
//!
//! let mut lifecycle = Lifecycle::default();
//! let effects = lifecycle.start();
//! assert_eq!(
//!     effects[0],
//!     Effect::Publish(FeedEvent::Connectivity(ConnectivityState::Connecting))
//! );
//! assert_eq!(effects[1], Effect::OpenChannel);
//! ```

pub mod app;
pub mod config;
pub mod connection;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use connection::{
    ConnectionManager, ConnectivityState, Effect, FeedEndpoint, FeedEvent, Lifecycle,
    WebSocketTransport,
};
pub use data::{BarrelCard, RankedEntry, ViewModel};
pub use error::FeedError;
pub use source::{BarrelRecord, DataSource, FeedSource, FileSource, Snapshot, TermCounts};
