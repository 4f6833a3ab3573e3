use crate::core::profiles::DEFAULT_PROFILE_NAME;
use crate::core::scale::Flavor;
use crate::utils::get_data_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration: the current profile and CLI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub active_profile: String,
    /// Flavor used by `show`/`export` when none is given on the command line
    #[serde(default)]
    pub default_flavor: Option<Flavor>,
    /// Write tracing output to the state directory instead of stderr
    #[serde(default)]
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_profile: default_profile(),
            default_flavor: None,
            log_to_file: false,
        }
    }
}

fn default_profile() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

/// Location of `config.json` in the data directory
pub fn config_path() -> Option<PathBuf> {
    get_data_dir().map(|dir| dir.join("config.json"))
}

/// Saves the config to `path` using an atomic write pattern.
/// 1. Writes to a temporary file (mode 0o600 on Unix).
/// 2. Atomically renames to the target path.
pub async fn save_config_to(path: &Path, config: &AppConfig) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(temp_path, path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "Disk full: cannot save configuration. Free up space and try again.",
            )
        } else {
            e
        }
    })
}

/// Loads the config from `path`, or returns the default if missing or malformed.
pub async fn load_config_from(path: &Path) -> AppConfig {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Saves the config to the data directory (no-op if it can't be determined).
pub async fn save_config(config: &AppConfig) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_config_to(&path, config).await,
        None => Ok(()),
    }
}

/// Loads the config from the data directory.
pub async fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_config_from(&path).await,
        None => AppConfig::default(),
    }
}

/// Blocking load for startup, before the tokio runtime exists.
pub fn load_config_blocking() -> AppConfig {
    config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            active_profile: "marketing".to_string(),
            default_flavor: Some(Flavor::CssVariable),
            log_to_file: true,
        };

        save_config_to(&path, &config).await.unwrap();
        assert_eq!(load_config_from(&path).await, config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_or_malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(load_config_from(&path).await, AppConfig::default());

        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert_eq!(load_config_from(&path).await, AppConfig::default());
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"log_to_file": true}"#).unwrap();
        assert_eq!(config.active_profile, DEFAULT_PROFILE_NAME);
        assert!(config.default_flavor.is_none());
        assert!(config.log_to_file);
    }
}
