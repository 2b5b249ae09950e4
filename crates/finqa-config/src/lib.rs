pub mod config;
pub mod manager;

pub use config::{
    ApiConfig, Config, ConfigError, ConfigResult, LogLevel, LoggingConfig, SessionConfig,
    UploadConfig,
    DEFAULT_MAX_UPLOAD_BYTES,
};
pub use manager::{ConfigManager, API_URL_ENV};

use std::path::PathBuf;

/// `~/.finqa`
pub fn finqa_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".finqa"))
}

/// `~/.finqa/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    finqa_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finqa_dir() {
        let dir = finqa_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().to_string_lossy().contains(".finqa"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/.finqa/config.json");
        assert!(expanded.is_some());
        assert!(!expanded.unwrap().to_string_lossy().starts_with("~"));

        assert_eq!(expand_tilde("/tmp/finqa.json"), Some(PathBuf::from("/tmp/finqa.json")));
    }
}
