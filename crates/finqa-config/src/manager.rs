use crate::config::{Config, ConfigError, ConfigResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Environment variable that overrides `api.base_url`
pub const API_URL_ENV: &str = "FINQA_API_URL";

/// Loads, validates and persists the configuration file
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// Load the configuration file, creating it with defaults when missing
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            let raw = tokio::fs::read_to_string(path).await?;
            serde_json::from_str(&Self::expand_env_vars(&raw)?)?
        } else {
            info!("No config at {:?}, writing defaults", path);
            let defaults = Config::default();
            write_json(path, &defaults).await?;
            defaults
        };

        let manager = Self::new(config, path.to_path_buf());
        Self::validate(&manager.snapshot().await)?;
        Ok(manager)
    }

    /// Wrap an in-memory config without touching disk
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the effective configuration, environment overrides applied
    pub async fn snapshot(&self) -> Config {
        let mut config = self.config.read().await.clone();
        Self::apply_env_overrides(&mut config);
        config
    }

    /// Write the file contents back, without environment overrides
    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.config.read().await.clone();
        write_json(&self.path, &config).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// Apply a change, validate it, then persist
    pub async fn update<F>(&self, change: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config) -> ConfigResult<()>,
    {
        {
            let mut current = self.config.write().await;
            let mut candidate = current.clone();
            change(&mut candidate)?;
            Self::validate(&candidate)?;
            *current = candidate;
        }
        self.save().await
    }

    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url cannot be empty".to_string(),
            ));
        }

        if config.upload.max_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "upload.max_size_bytes must be greater than 0".to_string(),
            ));
        }

        if config.upload.accepted_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upload.accepted_type cannot be empty".to_string(),
            ));
        }

        if config.upload.progress_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "upload.progress_interval_ms must be greater than 0".to_string(),
            ));
        }

        if config.api.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "api.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(config: &mut Config) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Overriding api.base_url from {}", API_URL_ENV);
                config.api.base_url = url;
            }
        }
    }

    /// Expand `${VAR}` and `${VAR:-default}`
    fn expand_env_vars(content: &str) -> ConfigResult<String> {
        let mut missing = None;
        let expanded = ENV_VAR_RE.replace_all(content, |caps: &Captures| {
            let (name, fallback) = match caps[1].split_once(":-") {
                Some((name, fallback)) => (name.to_string(), Some(fallback.to_string())),
                None => (caps[1].to_string(), None),
            };
            match (std::env::var(&name), fallback) {
                (Ok(value), _) => value,
                (Err(_), Some(fallback)) => fallback,
                (Err(_), None) => {
                    missing.get_or_insert(name);
                    String::new()
                }
            }
        });

        match missing {
            Some(name) => Err(ConfigError::EnvVarNotFound(name)),
            None => Ok(expanded.into_owned()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_json(path: &Path, config: &Config) -> ConfigResult<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, serde_json::to_string_pretty(config)?).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_creates_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        let config = manager.snapshot().await;

        assert!(config_path.exists());
        assert_eq!(config.upload.max_size_bytes, 10 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_env_var_expansion() {
        std::env::set_var("FINQA_TEST_IDENTITY", "user-9");

        let content = r#"{
            "identity": "${FINQA_TEST_IDENTITY}",
            "level": "${FINQA_TEST_UNSET_LEVEL:-debug}"
        }"#;
        let expanded = ConfigManager::expand_env_vars(content).unwrap();

        assert!(expanded.contains("user-9"));
        assert!(expanded.contains("\"debug\""));
    }

    #[tokio::test]
    async fn test_missing_env_var_without_default() {
        let result = ConfigManager::expand_env_vars("${FINQA_TEST_DEFINITELY_UNSET}");
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound(_))));
    }

    #[tokio::test]
    async fn test_config_validation() {
        let mut config = Config::default();
        config.upload.max_size_bytes = 0;
        assert!(ConfigManager::validate(&config).is_err());

        config.upload.max_size_bytes = 1024;
        assert!(ConfigManager::validate(&config).is_ok());

        config.api.base_url = "  ".to_string();
        assert!(ConfigManager::validate(&config).is_err());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_change() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::new(Config::default(), config_path.clone());

        let result = manager
            .update(|config| config.set_value("upload.progress_interval_ms", "0"))
            .await;
        assert!(result.is_err());
        assert_eq!(manager.snapshot().await.upload.progress_interval_ms, 200);

        manager
            .update(|config| config.set_value("api.base_url", "https://qa.example.com"))
            .await
            .unwrap();
        let raw = tokio::fs::read_to_string(&config_path).await.unwrap();
        let saved: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.api.base_url, "https://qa.example.com");
    }

    #[tokio::test]
    async fn test_env_override_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::new(Config::default(), config_path.clone());

        std::env::set_var(API_URL_ENV, "http://override.example.com:9000");
        let effective = manager.snapshot().await.api.base_url;
        manager.save().await.unwrap();
        std::env::remove_var(API_URL_ENV);

        assert_eq!(effective, "http://override.example.com:9000");
        let raw = tokio::fs::read_to_string(&config_path).await.unwrap();
        let saved: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.api.base_url, "http://localhost:8000");
    }
}
