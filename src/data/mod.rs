//! View models derived from telemetry snapshots.
//!
//! ## Submodules
//!
//! - [`view`]: The snapshot → [`ViewModel`] transformation (ranking, health
//!   classification, latency formatting)
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2s", "500ms")
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (decoded JSON)
//!        │
//!        ▼
//! ViewModel::from_snapshot()
//!        │
//!        ├──▶ top_terms / top_urls (stable top-5 ranking)
//!        │
//!        └──▶ barrel_cards (health label + zero-defaulted counters)
//! ```

pub mod duration;
pub mod view;

pub use view::{BarrelCard, RankedEntry, ViewModel};
