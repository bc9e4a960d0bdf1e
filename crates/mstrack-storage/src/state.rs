use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::ObjectMap;

/// Load and deserialize a single JSON object.
pub fn load_state<T: DeserializeOwned>(objects: &ObjectMap, key: &str) -> Result<T, StorageError> {
    let value = objects.get_object(key)?;
    Ok(T::deserialize(value)?)
}

/// Serialize and store a JSON object. Returns `true` if it replaced one.
pub fn save_state<T: Serialize>(
    objects: &mut ObjectMap,
    key: impl Into<String>,
    value: &T,
) -> Result<bool, StorageError> {
    let body = serde_json::to_value(value)?;
    Ok(objects.put_object(key, body))
}

/// Load and deserialize every object under a prefix, in key order.
pub fn load_all<T: DeserializeOwned>(
    objects: &ObjectMap,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    objects
        .objects_with_prefix(prefix)
        .map(|(_, value)| T::deserialize(value).map_err(StorageError::from))
        .collect()
}
