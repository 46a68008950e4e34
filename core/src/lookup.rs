//! The string-keyed input capability.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::{Map, Value};

/// Read access to a flat, string-keyed parameter input.
///
/// Consumed by generated constructors and by the runtime checker. Values are
/// returned as [`Cow`] so that sources holding non-string values (such as a
/// JSON object) can render them on demand.
pub trait Lookup {
    /// Returns the raw value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Returns every key present in the input.
    fn keys(&self) -> BTreeSet<&str>;

    /// Returns every present `(key, value)` pair, ordered by key.
    fn entries(&self) -> Vec<(&str, Cow<'_, str>)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }
}

impl Lookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        HashMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> BTreeSet<&str> {
        HashMap::keys(self).map(String::as_str).collect()
    }
}

impl Lookup for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        BTreeMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> BTreeSet<&str> {
        BTreeMap::keys(self).map(String::as_str).collect()
    }

    fn entries(&self) -> Vec<(&str, Cow<'_, str>)> {
        self.iter()
            .map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str())))
            .collect()
    }
}

/// JSON objects: strings are borrowed, `null` is absent, anything else is
/// rendered as JSON text (`5` becomes `"5"`).
impl Lookup for Map<String, Value> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match Map::get(self, key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    fn keys(&self) -> BTreeSet<&str> {
        self.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_lookup_renders_scalars() {
        let value = json!({"name": "x", "count": 5, "flag": true, "gone": null});
        let map = value.as_object().unwrap();

        assert_eq!(Lookup::get(map, "name").as_deref(), Some("x"));
        assert_eq!(Lookup::get(map, "count").as_deref(), Some("5"));
        assert_eq!(Lookup::get(map, "flag").as_deref(), Some("true"));
        assert_eq!(Lookup::get(map, "gone"), None);
        assert_eq!(
            Lookup::keys(map).into_iter().collect::<Vec<_>>(),
            ["count", "flag", "name"]
        );
    }

    #[test]
    fn test_entries_follow_key_order() {
        let map = HashMap::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        let entries: Vec<_> = map
            .entries()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(entries, ["a=1", "b=2"]);
    }
}
