//! Platform default broker mapping.
//!
//! Maps a check type to the broker that should run it when neither the
//! operator nor an enterprise broker decides otherwise. An entry is either a
//! single broker id or a list of ids paired with a `<check_type>_default`
//! index marker, where `-1` means "any of them".

use std::collections::BTreeMap;

use rand::Rng;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Keys a custom `broker.default` section must define, each alongside a
/// `<key>_default` index marker.
pub const REQUIRED_DEFAULT_KEYS: [&str; 3] = ["fallback", "json", "httptrap"];

/// Suffix of index marker keys.
pub const INDEX_SUFFIX: &str = "_default";

/// Index marker meaning "pick uniformly at random".
pub const RANDOM_INDEX: i64 = -1;

/// Result of applying an index marker to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChoice {
    /// Position selected in the list.
    At(usize),
    /// The list is empty.
    Empty,
    /// The index is neither `-1` nor within `0..len`.
    OutOfBounds,
}

/// Resolve an index marker against a list of `len` elements.
///
/// `-1` picks uniformly at random; any other value must satisfy
/// `0 <= index < len`.
pub fn choose_index<R: Rng + ?Sized>(len: usize, index: i64, rng: &mut R) -> ListChoice {
    if len == 0 {
        return ListChoice::Empty;
    }
    if index == RANDOM_INDEX {
        return ListChoice::At(rng.gen_range(0..len));
    }
    match usize::try_from(index) {
        Ok(i) if i < len => ListChoice::At(i),
        _ => ListChoice::OutOfBounds,
    }
}

/// A single default mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultEntry {
    /// One broker id, stored unvalidated.
    Single(String),
    /// Candidate ids with the index marker that selects among them.
    List { ids: Vec<String>, index: i64 },
}

/// Check type to default broker mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultBrokerMap {
    entries: BTreeMap<String, DefaultEntry>,
}

impl DefaultBrokerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a single-id entry.
    #[must_use]
    pub fn with_broker(mut self, check_type: impl Into<String>, id: impl Into<String>) -> Self {
        self.entries
            .insert(check_type.into(), DefaultEntry::Single(id.into()));
        self
    }

    /// Add or replace a list entry.
    #[must_use]
    pub fn with_list(
        mut self,
        check_type: impl Into<String>,
        ids: Vec<String>,
        index: i64,
    ) -> Self {
        self.entries
            .insert(check_type.into(), DefaultEntry::List { ids, index });
        self
    }

    /// Build from a JSON object as served by the COSI defaults service.
    ///
    /// Values that are neither an id nor a list of ids are ignored, as are
    /// index markers. A list without a marker selects its first element.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut entries = BTreeMap::new();

        for (key, value) in object {
            if let Some(base) = key.strip_suffix(INDEX_SUFFIX) {
                if object.contains_key(base) && index_value(value).is_some() {
                    continue;
                }
            }

            let entry = match value {
                Value::Array(items) => {
                    let ids: Vec<String> = items.iter().filter_map(id_text).collect();
                    let index = object
                        .get(&format!("{key}{INDEX_SUFFIX}"))
                        .and_then(index_value)
                        .unwrap_or(0);
                    DefaultEntry::List { ids, index }
                }
                other => match id_text(other) {
                    Some(id) => DefaultEntry::Single(id),
                    None => continue,
                },
            };
            entries.insert(key.clone(), entry);
        }

        Self { entries }
    }

    /// Build from the custom options `broker.default` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCustomDefaults`] naming the first
    /// required key (or index marker) that is missing.
    pub fn from_custom(object: &Map<String, Value>) -> Result<Self, ConfigError> {
        for key in REQUIRED_DEFAULT_KEYS {
            let marker = format!("{key}{INDEX_SUFFIX}");
            if !object.contains_key(key) {
                return Err(ConfigError::InvalidCustomDefaults {
                    key: key.to_string(),
                });
            }
            if !object.contains_key(&marker) {
                return Err(ConfigError::InvalidCustomDefaults { key: marker });
            }
        }
        Ok(Self::from_object(object))
    }

    #[must_use]
    pub fn get(&self, check_type: &str) -> Option<&DefaultEntry> {
        self.entries.get(check_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefaultEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn index_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn choose_index_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(choose_index(3, 0, &mut rng), ListChoice::At(0));
        assert_eq!(choose_index(3, 2, &mut rng), ListChoice::At(2));
        assert_eq!(choose_index(3, 3, &mut rng), ListChoice::OutOfBounds);
        assert_eq!(choose_index(3, -2, &mut rng), ListChoice::OutOfBounds);
        assert_eq!(choose_index(0, -1, &mut rng), ListChoice::Empty);
    }

    #[test]
    fn choose_index_random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            match choose_index(4, RANDOM_INDEX, &mut rng) {
                ListChoice::At(i) => assert!(i < 4),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn from_object_reads_single_ids_and_lists() {
        let map = DefaultBrokerMap::from_object(&object(json!({
            "json": "5",
            "httptrap": 35,
            "fallback": ["1", 2],
            "fallback_default": -1,
            "comment": {"ignored": true},
        })));

        assert_eq!(map.get("json"), Some(&DefaultEntry::Single("5".into())));
        assert_eq!(map.get("httptrap"), Some(&DefaultEntry::Single("35".into())));
        assert_eq!(
            map.get("fallback"),
            Some(&DefaultEntry::List {
                ids: vec!["1".into(), "2".into()],
                index: -1
            })
        );
        assert!(map.get("fallback_default").is_none());
        assert!(map.get("comment").is_none());
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn list_without_marker_uses_first_element() {
        let map = DefaultBrokerMap::from_object(&object(json!({ "json": ["9", "10"] })));
        assert_eq!(
            map.get("json"),
            Some(&DefaultEntry::List {
                ids: vec!["9".into(), "10".into()],
                index: 0
            })
        );
    }

    #[test]
    fn check_type_ending_in_marker_suffix_is_kept_when_not_an_index() {
        let map = DefaultBrokerMap::from_object(&object(json!({ "weird_default": "4" })));
        assert_eq!(map.get("weird_default"), Some(&DefaultEntry::Single("4".into())));
    }

    #[test]
    fn from_custom_requires_all_keys_and_markers() {
        let err = DefaultBrokerMap::from_custom(&object(json!({
            "fallback": ["1"], "fallback_default": 0,
            "json": ["2"], "json_default": 0,
            "httptrap": ["3"],
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCustomDefaults { ref key } if key == "httptrap_default"
        ));

        let err = DefaultBrokerMap::from_custom(&object(json!({ "json": ["2"] }))).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCustomDefaults { ref key } if key == "fallback"
        ));
    }

    #[test]
    fn from_custom_accepts_complete_section() {
        let map = DefaultBrokerMap::from_custom(&object(json!({
            "fallback": ["1"], "fallback_default": 0,
            "json": ["2", "3"], "json_default": 1,
            "httptrap": ["4"], "httptrap_default": -1,
        })))
        .unwrap();
        assert_eq!(
            map.get("json"),
            Some(&DefaultEntry::List {
                ids: vec!["2".into(), "3".into()],
                index: 1
            })
        );
    }
}
