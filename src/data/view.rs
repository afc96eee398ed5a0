//! Snapshot to view model transformation.
//!
//! [`ViewModel::from_snapshot`] is a pure function: the same snapshot always
//! yields the same view model and nothing is carried over between calls.

use serde::Serialize;

use crate::source::{BarrelRecord, Snapshot, TermCounts};

/// Maximum number of ranked entries kept per list.
pub const TOP_N: usize = 5;

/// The only barrel status treated as healthy.
pub const HEALTHY_STATUS: &str = "Active";

/// Card label for a healthy barrel.
pub const LABEL_ACTIVE: &str = "ATIVO";

/// Card label for every other barrel.
pub const LABEL_OFFLINE: &str = "OFFLINE";

/// One ranked `(term, count)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

/// Display record for one barrel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarrelCard {
    pub name: String,
    pub is_healthy: bool,
    pub label: &'static str,
    pub inverted_index_count: u64,
    pub incoming_links_count: u64,
    /// Mean latency in ms, one fractional digit.
    pub latency: String,
    pub request_count: u64,
}

impl BarrelCard {
    /// Build a card from a wire record, defaulting absent numbers to zero.
    pub fn from_record(record: &BarrelRecord) -> Self {
        let is_healthy = record.status.as_deref() == Some(HEALTHY_STATUS);
        Self {
            name: record.name.clone(),
            is_healthy,
            label: if is_healthy { LABEL_ACTIVE } else { LABEL_OFFLINE },
            inverted_index_count: record.inverted_index_count.unwrap_or(0),
            incoming_links_count: record.incoming_links_count.unwrap_or(0),
            latency: format_latency(record.avg_response_time.unwrap_or(0.0)),
            request_count: record.request_count.unwrap_or(0),
        }
    }
}

/// Display-ready structure derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub top_terms: Vec<RankedEntry>,
    pub top_urls: Vec<RankedEntry>,
    pub barrel_cards: Vec<BarrelCard>,
}

impl ViewModel {
    /// Derive the view model for a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            top_terms: rank_top(snapshot.top_search_terms.as_ref()),
            top_urls: rank_top(snapshot.top_consulted_urls.as_ref()),
            barrel_cards: snapshot
                .barrel_details
                .iter()
                .flatten()
                .map(BarrelCard::from_record)
                .collect(),
        }
    }

    pub fn healthy_count(&self) -> usize {
        self.barrel_cards.iter().filter(|c| c.is_healthy).count()
    }

    pub fn offline_count(&self) -> usize {
        self.barrel_cards.len() - self.healthy_count()
    }

    /// Sum of `request_count` across all barrels.
    pub fn total_requests(&self) -> u64 {
        self.barrel_cards.iter().map(|c| c.request_count).sum()
    }
}

/// Rank entries by count, highest first, keeping arrival order for ties.
pub fn rank_top(counts: Option<&TermCounts>) -> Vec<RankedEntry> {
    let Some(counts) = counts else {
        return Vec::new();
    };

    let mut entries: Vec<RankedEntry> = counts
        .iter()
        .map(|(key, count)| RankedEntry {
            key: key.to_string(),
            count,
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_N);
    entries
}

/// Format a latency with one fractional digit (`0` -> `"0.0"`).
pub fn format_latency(ms: f64) -> String {
    format!("{:.1}", ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(json: &str) -> ViewModel {
        ViewModel::from_snapshot(&Snapshot::decode(json).unwrap())
    }

    fn pairs(entries: &[RankedEntry]) -> Vec<(&str, u64)> {
        entries.iter().map(|e| (e.key.as_str(), e.count)).collect()
    }

    #[test]
    fn test_ranks_terms_descending() {
        let vm = view(r#"{"topSearchTerms":{"lisboa":10,"porto":25,"faro":3},"barrelDetails":[]}"#);
        assert_eq!(pairs(&vm.top_terms), vec![("porto", 25), ("lisboa", 10), ("faro", 3)]);
        assert!(vm.barrel_cards.is_empty());
    }

    #[test]
    fn test_keeps_at_most_five() {
        let vm = view(r#"{"topSearchTerms":{"a":1,"b":7,"c":3,"d":9,"e":2,"f":7,"g":5}}"#);
        assert_eq!(vm.top_terms.len(), TOP_N);
        assert!(vm.top_terms.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(pairs(&vm.top_terms), vec![("d", 9), ("b", 7), ("f", 7), ("g", 5), ("c", 3)]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let vm = view(r#"{"topSearchTerms":{"zeta":4,"alpha":4,"mid":4}}"#);
        assert_eq!(pairs(&vm.top_terms), vec![("zeta", 4), ("alpha", 4), ("mid", 4)]);
    }

    #[test]
    fn test_empty_or_absent_terms() {
        assert!(view(r#"{"topSearchTerms":{}}"#).top_terms.is_empty());
        assert!(view(r#"{}"#).top_terms.is_empty());
        assert!(view(r#"{"topSearchTerms":null}"#).top_terms.is_empty());
    }

    #[test]
    fn test_consulted_urls_follow_same_rules() {
        let vm = view(r#"{"topConsultedUrls":{"https://a":1,"https://b":3}}"#);
        assert_eq!(pairs(&vm.top_urls), vec![("https://b", 3), ("https://a", 1)]);
        assert!(vm.top_terms.is_empty());
    }

    #[test]
    fn test_active_barrel_card() {
        let vm = view(r#"{"barrelDetails":[{"name":"B1","status":"Active","avgResponseTime":12.34}]}"#);
        let card = &vm.barrel_cards[0];
        assert_eq!(card.name, "B1");
        assert!(card.is_healthy);
        assert_eq!(card.label, "ATIVO");
        assert_eq!(card.latency, "12.3");
        assert_eq!(card.inverted_index_count, 0);
        assert_eq!(card.incoming_links_count, 0);
        assert_eq!(card.request_count, 0);
    }

    #[test]
    fn test_offline_barrel_card() {
        let vm = view(r#"{"barrelDetails":[{"name":"B2","status":"Down"}]}"#);
        let card = &vm.barrel_cards[0];
        assert!(!card.is_healthy);
        assert_eq!(card.label, "OFFLINE");
        assert_eq!(card.latency, "0.0");
        assert_eq!(card.inverted_index_count, 0);
        assert_eq!(card.incoming_links_count, 0);
        assert_eq!(card.request_count, 0);
    }

    #[test]
    fn test_health_is_exact_match() {
        for status in [r#""active""#, r#"" Active""#, r#""ACTIVE""#, r#""Ativo""#, "null"] {
            let json = format!(r#"{{"barrelDetails":[{{"name":"B","status":{}}}]}}"#, status);
            assert!(!view(&json).barrel_cards[0].is_healthy, "status {status} should be offline");
        }
        let vm = view(r#"{"barrelDetails":[{"name":"B"}]}"#);
        assert!(!vm.barrel_cards[0].is_healthy);
    }

    #[test]
    fn test_cards_keep_order_and_duplicates() {
        let vm = view(
            r#"{"barrelDetails":[
                {"name":"B3","status":"Active"},
                {"name":"B1","status":"Down"},
                {"name":"B3","status":"Active","requestCount":4}
            ]}"#,
        );
        let names: Vec<&str> = vm.barrel_cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B3", "B1", "B3"]);
        assert_eq!(vm.healthy_count(), 2);
        assert_eq!(vm.offline_count(), 1);
        assert_eq!(vm.total_requests(), 4);
    }

    #[test]
    fn test_all_zero_records_are_kept() {
        let vm = view(r#"{"topSearchTerms":{"idle":0},"barrelDetails":[{"name":"B0"}]}"#);
        assert_eq!(vm.top_terms.len(), 1);
        assert_eq!(vm.barrel_cards.len(), 1);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let snapshot = Snapshot::decode(
            r#"{"topSearchTerms":{"a":2,"b":2},"barrelDetails":[{"name":"B1","status":"Active","avgResponseTime":0.05}]}"#,
        )
        .unwrap();
        assert_eq!(ViewModel::from_snapshot(&snapshot), ViewModel::from_snapshot(&snapshot));
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(0.0), "0.0");
        assert_eq!(format_latency(12.34), "12.3");
        assert_eq!(format_latency(7.0), "7.0");
        assert_eq!(format_latency(150.96), "151.0");
    }
}
