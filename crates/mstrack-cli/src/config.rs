use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MstrackConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// JSON data file holding patients, visits and indicator results.
    pub data_path: PathBuf,
    /// Webhook receiving critical alerts. Alerts are dropped when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_webhook_url: Option<String>,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl MstrackConfig {
    /// Configuration used when no config file exists yet.
    pub fn with_defaults() -> eyre::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
        Ok(Self {
            config_version: CURRENT_VERSION,
            data_path: base.join("mstrack").join("mstrack.json"),
            alert_webhook_url: None,
            log_filter: default_log_filter(),
            json_logs: false,
        })
    }

    /// Apply `MSTRACK_*` overrides. `var` looks up an environment variable.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("MSTRACK_DATA") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(url) = var("MSTRACK_ALERT_WEBHOOK") {
            self.alert_webhook_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Some(filter) = var("MSTRACK_LOG") {
            self.log_filter = filter;
        }
        if let Some(flag) = var("MSTRACK_JSON_LOGS") {
            self.json_logs = matches!(flag.as_str(), "1" | "true" | "yes");
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("mstrack"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config file if present, otherwise defaults, then apply the
/// environment.
pub fn load_effective(path: &Path) -> eyre::Result<MstrackConfig> {
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        MstrackConfig::with_defaults()?
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

pub fn load_config(path: &Path) -> eyre::Result<MstrackConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: MstrackConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update mstrack."
        ));
    }

    // v0 → v1: `webhook_url` renamed to `alert_webhook_url`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(url) = obj.remove("webhook_url") {
            obj.entry("alert_webhook_url").or_insert(url);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed webhook_url)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &MstrackConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MstrackConfig {
        MstrackConfig {
            config_version: CURRENT_VERSION,
            data_path: PathBuf::from("/tmp/mstrack.json"),
            alert_webhook_url: Some("https://hooks.example.org/ms".to_string()),
            log_filter: "debug".to_string(),
            json_logs: true,
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mstrack").join("config.json");
        save_config(&path, &config()).unwrap();
        assert_eq!(load_config(&path).unwrap(), config());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        save_config(&path, &config()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn v0_config_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "data_path": "/srv/ms.json", "webhook_url": "https://hooks.example.org/x" }"#,
        )
        .unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.config_version, 1);
        assert_eq!(loaded.alert_webhook_url.as_deref(), Some("https://hooks.example.org/x"));
        assert_eq!(loaded.log_filter, "info");
        assert!(!loaded.json_logs);
    }

    #[test]
    fn newer_config_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "config_version": 99, "data_path": "/x" }"#).unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("newer than this build supports"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut cfg = config();
        cfg.apply_env(|key| match key {
            "MSTRACK_DATA" => Some("/data/other.json".to_string()),
            "MSTRACK_ALERT_WEBHOOK" => Some(String::new()),
            "MSTRACK_JSON_LOGS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(cfg.data_path, PathBuf::from("/data/other.json"));
        assert_eq!(cfg.alert_webhook_url, None);
        assert_eq!(cfg.log_filter, "debug");
        assert!(!cfg.json_logs);
    }
}
