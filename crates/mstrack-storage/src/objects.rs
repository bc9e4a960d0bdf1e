use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;

/// An ordered key → JSON object map. Keys follow
/// [`mstrack_core::store_keys`], so prefix scans double as queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectMap {
    objects: BTreeMap<String, Value>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get an object by key.
    pub fn get_object(&self, key: &str) -> Result<&Value, StorageError> {
        self.objects.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })
    }

    /// Put an object, replacing any previous value under the same key.
    /// Returns `true` when an existing object was replaced.
    pub fn put_object(&mut self, key: impl Into<String>, body: Value) -> bool {
        self.objects.insert(key.into(), body).is_some()
    }

    /// Delete an object. Returns `true` if it existed.
    pub fn delete_object(&mut self, key: &str) -> bool {
        self.objects.remove(key).is_some()
    }

    /// Delete all objects under a prefix. Returns the number deleted.
    pub fn delete_objects_by_prefix(&mut self, prefix: &str) -> usize {
        let keys = self.list_objects(prefix);
        for key in &keys {
            self.objects.remove(key);
        }
        keys.len()
    }

    /// List keys under a prefix, in key order.
    pub fn list_objects(&self, prefix: &str) -> Vec<String> {
        self.objects_with_prefix(prefix)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Iterate `(key, object)` pairs under a prefix, in key order.
    pub fn objects_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.objects
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_replaces_existing_key() {
        let mut map = ObjectMap::new();
        assert!(!map.put_object("a/1.json", json!(1)));
        assert!(map.put_object("a/1.json", json!(2)));
        assert_eq!(map.get_object("a/1.json").unwrap(), &json!(2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn missing_key_is_not_found() {
        let map = ObjectMap::new();
        assert!(matches!(
            map.get_object("nope"),
            Err(StorageError::NotFound { ref key }) if key == "nope"
        ));
    }

    #[test]
    fn prefix_listing_is_scoped() {
        let mut map = ObjectMap::new();
        map.put_object("indicators/a/ARR.json", json!({}));
        map.put_object("indicators/a/T1_Gd.json", json!({}));
        map.put_object("indicators/b/ARR.json", json!({}));
        map.put_object("visits/a.json", json!({}));

        assert_eq!(
            map.list_objects("indicators/a/"),
            vec!["indicators/a/ARR.json", "indicators/a/T1_Gd.json"]
        );
        assert_eq!(map.delete_objects_by_prefix("indicators/"), 3);
        assert_eq!(map.list_objects(""), vec!["visits/a.json"]);
    }
}
