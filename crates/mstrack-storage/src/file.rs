//! Whole-document persistence of an [`ObjectMap`] to a JSON file.

use std::path::Path;

use crate::error::StorageError;
use crate::objects::ObjectMap;

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read an object map from `path`. A missing file is an empty map.
pub fn read_objects(path: &Path) -> Result<ObjectMap, StorageError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no data file yet, starting empty");
            return Ok(ObjectMap::new());
        }
        Err(e) => return Err(io_error(path, e)),
    };

    let json: serde_json::Value = serde_json::from_str(&contents)?;
    if !json.is_object() {
        return Err(StorageError::Corrupt {
            path: path.display().to_string(),
        });
    }
    Ok(serde_json::from_value(json)?)
}

/// Write an object map to `path`, replacing the file atomically.
pub fn write_objects(path: &Path, objects: &ObjectMap) -> Result<(), StorageError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }

    let json = serde_json::to_string_pretty(objects)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| io_error(&tmp_path, e))?;

    // Patient data: owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| io_error(&tmp_path, e))?;
    }

    std::fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;

    tracing::debug!(path = %path.display(), objects = objects.len(), "data file written");
    Ok(())
}
