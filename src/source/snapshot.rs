//! Wire types for telemetry snapshots.
//!
//! These types match the JSON the search gateway pushes on its stats feed.
//! One message carries one complete [`Snapshot`]; every field is optional
//! and unknown fields are ignored.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One complete telemetry payload pushed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Search term popularity, in the order the keys appeared on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_search_terms: Option<TermCounts>,

    /// Most consulted result URLs, same shape as `top_search_terms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_consulted_urls: Option<TermCounts>,

    /// Per-barrel health, in array order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrel_details: Option<Vec<BarrelRecord>>,
}

impl Snapshot {
    /// Decode a snapshot from one raw push message.
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// One barrel (index worker) as reported at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrelRecord {
    /// Missing or null names decode as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Only the literal `"Active"` counts as healthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Number of words in the barrel's inverted index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverted_index_count: Option<u64>,

    /// Number of URLs in the barrel's incoming links table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_links_count: Option<u64>,

    /// Mean search latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,

    /// Number of searches the mean latency is based on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_count: Option<u64>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `{ key: count }` JSON object that remembers key order.
///
/// A key that appears twice keeps its first position and its last value.
///
/// Ranking breaks ties by the order entries arrived in, so the map is kept
/// as a plain sequence of pairs rather than a sorted or hashed map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts(pub Vec<(String, u64)>);

impl TermCounts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for TermCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for TermCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TermCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = TermCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of strings to non-negative integers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, u64)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                let mut positions: HashMap<String, usize> = HashMap::new();
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    match positions.get(&key).copied() {
                        Some(at) => entries[at].1 = count,
                        None => {
                            positions.insert(key.clone(), entries.len());
                            entries.push((key, count));
                        }
                    }
                }
                Ok(TermCounts(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "topSearchTerms": { "lisboa": 10, "porto": 25 },
            "topConsultedUrls": { "https://uc.pt": 4 },
            "barrelDetails": [
                {
                    "name": "Barrel-1",
                    "status": "Active",
                    "invertedIndexCount": 1200,
                    "incomingLinksCount": 80,
                    "avgResponseTime": 3.25,
                    "requestCount": 17
                }
            ]
        }"#;

        let snapshot = Snapshot::decode(json).unwrap();
        let terms = snapshot.top_search_terms.unwrap();
        assert_eq!(terms.0, vec![("lisboa".to_string(), 10), ("porto".to_string(), 25)]);
        assert_eq!(snapshot.top_consulted_urls.unwrap().len(), 1);

        let barrels = snapshot.barrel_details.unwrap();
        assert_eq!(barrels.len(), 1);
        let barrel = &barrels[0];
        assert_eq!(barrel.name, "Barrel-1");
        assert_eq!(barrel.status.as_deref(), Some("Active"));
        assert_eq!(barrel.inverted_index_count, Some(1200));
        assert_eq!(barrel.incoming_links_count, Some(80));
        assert_eq!(barrel.avg_response_time, Some(3.25));
        assert_eq!(barrel.request_count, Some(17));
    }

    #[test]
    fn test_key_order_is_wire_order() {
        let snapshot = Snapshot::decode(r#"{"topSearchTerms":{"z":1,"a":1,"m":1}}"#).unwrap();
        let keys: Vec<&str> = snapshot.top_search_terms.as_ref().unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_missing_and_null_fields() {
        let snapshot = Snapshot::decode(r#"{"topSearchTerms":null}"#).unwrap();
        assert!(snapshot.top_search_terms.is_none());
        assert!(snapshot.barrel_details.is_none());

        let snapshot = Snapshot::decode(r#"{"barrelDetails":[{"name":"B2","status":null}]}"#).unwrap();
        let barrel = &snapshot.barrel_details.unwrap()[0];
        assert!(barrel.status.is_none());
        assert!(barrel.avg_response_time.is_none());
    }

    #[test]
    fn test_null_barrel_name_keeps_snapshot() {
        let snapshot = Snapshot::decode(
            r#"{"topSearchTerms":{"porto":3},"barrelDetails":[{"name":null,"status":"Active"},{"name":"B2"}]}"#,
        )
        .unwrap();
        let barrels = snapshot.barrel_details.unwrap();
        assert_eq!(barrels.len(), 2);
        assert_eq!(barrels[0].name, "");
        assert_eq!(barrels[0].status.as_deref(), Some("Active"));
        assert_eq!(barrels[1].name, "B2");
        assert_eq!(snapshot.top_search_terms.unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let snapshot = Snapshot::decode(r#"{"topSearchTerms":{"a":1,"b":5,"a":9}}"#).unwrap();
        let terms = snapshot.top_search_terms.unwrap();
        assert_eq!(terms.0, vec![("a".to_string(), 9), ("b".to_string(), 5)]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let snapshot =
            Snapshot::decode(r#"{"uptime":42,"barrelDetails":[{"name":"B1","shard":3}]}"#).unwrap();
        assert_eq!(snapshot.barrel_details.unwrap()[0].name, "B1");
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        assert!(Snapshot::decode("not json").is_err());
        assert!(Snapshot::decode(r#"{"topSearchTerms":{"x":-1}}"#).is_err());
        assert!(Snapshot::decode(r#"{"barrelDetails":{}}"#).is_err());
    }

    #[test]
    fn test_serialize_keeps_order() {
        let counts: TermCounts = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"b":2,"a":1}"#);
    }
}
