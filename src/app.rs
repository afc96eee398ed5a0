//! Application state and navigation logic.

use std::time::Instant;

use crate::data::{BarrelCard, ViewModel};
use crate::source::{ConnectivityState, DataSource, FeedEvent};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Top searches and most consulted URLs.
    Overview,
    /// One card per barrel.
    Barrels,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Barrels,
            View::Barrels => View::Overview,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Barrels => "Barrels",
        }
    }
}

/// Main application state.
///
/// The app is the rendering sink: it owns the last view model and replaces
/// it wholesale when a snapshot arrives. Connectivity changes only move the
/// indicator; the view model stays as it was.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub view: Option<ViewModel>,
    pub connectivity: ConnectivityState,
    pub last_updated: Option<Instant>,
    pub load_error: Option<String>,

    // Navigation state
    pub selected_barrel_index: usize,

    // Search/filter (barrel names)
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source, detecting the theme
    /// from the terminal.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self::with_theme(source, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            view: None,
            connectivity: ConnectivityState::Disconnected,
            last_updated: None,
            load_error: None,
            selected_barrel_index: 0,
            filter_text: String::new(),
            filter_active: false,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Whether the source can never deliver data.
    pub fn source_unavailable(&self) -> bool {
        self.source.is_fatal()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain every event the source has queued.
    ///
    /// Returns the number of snapshots applied.
    pub fn reload_data(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.source.poll() {
            match event {
                FeedEvent::Snapshot(snapshot) => {
                    self.view = Some(ViewModel::from_snapshot(&snapshot));
                    self.last_updated = Some(Instant::now());
                    applied += 1;
                }
                FeedEvent::Connectivity(state) => {
                    self.connectivity = state;
                }
            }
        }

        self.load_error = self.source.error();

        if applied > 0 {
            self.clamp_selection();
        }
        applied
    }

    fn clamp_selection(&mut self) {
        let count = self.filtered_barrels().len();
        if self.selected_barrel_index >= count {
            self.selected_barrel_index = count.saturating_sub(1);
        }
    }

    /// Barrel cards that match the current filter, in snapshot order.
    pub fn filtered_barrels(&self) -> Vec<&BarrelCard> {
        let Some(ref view) = self.view else {
            return Vec::new();
        };
        view.barrel_cards.iter().filter(|c| self.matches_filter(&c.name)).collect()
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by n barrels.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.filtered_barrels().len().saturating_sub(1);
        self.selected_barrel_index = (self.selected_barrel_index + n).min(max);
    }

    /// Move selection up by n barrels.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_barrel_index = self.selected_barrel_index.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_first(&mut self) {
        self.selected_barrel_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_barrel_index = self.filtered_barrels().len().saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
        self.current_view = View::Barrels;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_barrel_index = 0;
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a barrel name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current view model to a file.
    pub fn export_state(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let Some(ref view) = self.view else {
            anyhow::bail!("No data to export");
        };
        crate::export::write_view(view, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FeedSource, Snapshot};
    use tokio::sync::mpsc;

    fn app_with_feed() -> (mpsc::Sender<FeedEvent>, App) {
        let (tx, rx) = mpsc::channel(16);
        let source = FeedSource::from_receiver(rx, "test");
        (tx, App::with_theme(Box::new(source), Theme::dark()))
    }

    fn snapshot(json: &str) -> FeedEvent {
        FeedEvent::Snapshot(Snapshot::decode(json).unwrap())
    }

    #[tokio::test]
    async fn test_starts_blank_and_disconnected() {
        let (_tx, mut app) = app_with_feed();
        assert_eq!(app.reload_data(), 0);
        assert!(app.view.is_none());
        assert_eq!(app.connectivity, ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_does_not_touch_view() {
        let (tx, mut app) = app_with_feed();
        tx.send(FeedEvent::Connectivity(ConnectivityState::Connected)).await.unwrap();
        app.reload_data();

        assert!(app.connectivity.is_connected());
        assert!(app.view.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_keeps_last_view() {
        let (tx, mut app) = app_with_feed();
        tx.send(FeedEvent::Connectivity(ConnectivityState::Connected)).await.unwrap();
        tx.send(snapshot(r#"{"topSearchTerms":{"porto":25},"barrelDetails":[{"name":"B1","status":"Active"}]}"#))
            .await
            .unwrap();
        app.reload_data();
        let before = app.view.clone().unwrap();

        tx.send(FeedEvent::Connectivity(ConnectivityState::Disconnected)).await.unwrap();
        app.reload_data();
        assert_eq!(app.connectivity, ConnectivityState::Disconnected);
        assert_eq!(app.view.as_ref(), Some(&before));

        // Reconnecting does not clear it either
        tx.send(FeedEvent::Connectivity(ConnectivityState::Connecting)).await.unwrap();
        tx.send(FeedEvent::Connectivity(ConnectivityState::Connected)).await.unwrap();
        app.reload_data();
        assert_eq!(app.view.as_ref(), Some(&before));
    }

    #[tokio::test]
    async fn test_each_snapshot_replaces_view() {
        let (tx, mut app) = app_with_feed();
        tx.send(snapshot(r#"{"topSearchTerms":{"a":1},"barrelDetails":[{"name":"B1"}]}"#)).await.unwrap();
        tx.send(snapshot(r#"{"topSearchTerms":{"b":2}}"#)).await.unwrap();
        assert_eq!(app.reload_data(), 2);

        let view = app.view.as_ref().unwrap();
        assert_eq!(view.top_terms.len(), 1);
        assert_eq!(view.top_terms[0].key, "b");
        assert!(view.barrel_cards.is_empty());
    }

    #[tokio::test]
    async fn test_selection_is_clamped_to_new_snapshot() {
        let (tx, mut app) = app_with_feed();
        tx.send(snapshot(r#"{"barrelDetails":[{"name":"B1"},{"name":"B2"},{"name":"B3"}]}"#))
            .await
            .unwrap();
        app.reload_data();
        app.select_last();
        assert_eq!(app.selected_barrel_index, 2);

        tx.send(snapshot(r#"{"barrelDetails":[{"name":"B1"}]}"#)).await.unwrap();
        app.reload_data();
        assert_eq!(app.selected_barrel_index, 0);
    }

    #[tokio::test]
    async fn test_filter_matches_names() {
        let (tx, mut app) = app_with_feed();
        tx.send(snapshot(r#"{"barrelDetails":[{"name":"Barrel-1"},{"name":"Replica-2"}]}"#))
            .await
            .unwrap();
        app.reload_data();

        app.start_filter();
        for c in "repl".chars() {
            app.filter_push(c);
        }
        let names: Vec<&str> = app.filtered_barrels().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Replica-2"]);

        app.clear_filter();
        assert_eq!(app.filtered_barrels().len(), 2);
    }

    #[test]
    fn test_unsupported_source_is_reported() {
        let source = FeedSource::unsupported("no tls");
        let mut app = App::with_theme(Box::new(source), Theme::dark());
        app.reload_data();
        assert!(app.source_unavailable());
        assert_eq!(app.load_error.as_deref(), Some("no tls"));
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Overview.next(), View::Barrels);
        assert_eq!(View::Barrels.next(), View::Overview);
    }
}
