//! Configuration resolution for Helmreg.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/helmreg/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete Helmreg configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database. Falls back to [`database_path`] when unset.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "info".to_string(),
        }
    }
}

/// Identity and role configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Email domain whose accounts act with the authority role.
    pub authority_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authority_domain: "police.gov".to_string(),
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let global = load_config_file(&global_path)?;
            merge_config(&mut config, global);
        }
    }

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Get the default database path.
pub fn database_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("registry.db"))
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".helmreg"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/helmreg"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("helmreg"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    if overlay.storage.database_path.is_some() {
        base.storage.database_path = overlay.storage.database_path;
    }
    base.storage.log_level = overlay.storage.log_level;
    base.auth = overlay.auth;
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(val) = std::env::var("HELMREG_DATABASE_PATH") {
        config.storage.database_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("HELMREG_LOG_LEVEL") {
        config.storage.log_level = val;
    }
    if let Ok(val) = std::env::var("HELMREG_AUTHORITY_DOMAIN") {
        config.auth.authority_domain = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_authority_domain_is_police_gov() {
        let config = Config::default();
        assert_eq!(config.auth.authority_domain, "police.gov");
    }

    #[test]
    fn default_storage_has_no_explicit_path() {
        let config = Config::default();
        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.log_level, "info");
    }

    #[test]
    fn overlay_replaces_auth_and_keeps_base_path() {
        let mut base = Config::default();
        base.storage.database_path = Some(PathBuf::from("/tmp/base.db"));

        let mut overlay = Config::default();
        overlay.auth.authority_domain = "authority.example".to_string();

        merge_config(&mut base, overlay);
        assert_eq!(base.auth.authority_domain, "authority.example");
        assert_eq!(base.storage.database_path, Some(PathBuf::from("/tmp/base.db")));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut config = Config::default();
        config.auth.authority_domain = "hq.example".to_string();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.auth.authority_domain, "hq.example");
    }
}
