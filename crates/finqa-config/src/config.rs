use serde::{Deserialize, Serialize};

/// Default upload ceiling, 10 MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            upload: UploadConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Read a value by dotted key, e.g. `api.base_url`
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["api", "base_url"] => Some(self.api.base_url.clone()),
            ["api", "timeout_seconds"] => self.api.timeout_seconds.map(|t| t.to_string()),
            ["upload", "accepted_type"] => Some(self.upload.accepted_type.clone()),
            ["upload", "max_size_bytes"] => Some(self.upload.max_size_bytes.to_string()),
            ["upload", "simulate_progress"] => Some(self.upload.simulate_progress.to_string()),
            ["upload", "progress_interval_ms"] => {
                Some(self.upload.progress_interval_ms.to_string())
            }
            ["session", "identity"] => self.session.identity.clone(),
            ["session", "welcome_message"] => Some(self.session.welcome_message.clone()),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "file"] => self.logging.file.clone(),
            ["logging", "json"] => Some(self.logging.json.to_string()),
            _ => None,
        }
    }

    /// Set a value by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["api", "base_url"] => {
                self.api.base_url = value.to_string();
            }
            ["api", "timeout_seconds"] => {
                self.api.timeout_seconds = Some(value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?);
            }
            ["upload", "accepted_type"] => {
                self.upload.accepted_type = value.to_string();
            }
            ["upload", "max_size_bytes"] => {
                self.upload.max_size_bytes = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?;
            }
            ["upload", "simulate_progress"] => {
                self.upload.simulate_progress = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid boolean: {}", value))
                })?;
            }
            ["upload", "progress_interval_ms"] => {
                self.upload.progress_interval_ms = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?;
            }
            ["session", "identity"] => {
                self.session.identity = Some(value.to_string());
            }
            ["session", "welcome_message"] => {
                self.session.welcome_message = value.to_string();
            }
            ["logging", "level"] => {
                self.logging.level = value.parse()?;
            }
            ["logging", "file"] => {
                self.logging.file = Some(value.to_string());
            }
            ["logging", "json"] => {
                self.logging.json = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid boolean: {}", value))
                })?;
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

/// Backend location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request deadline; unset means requests wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Upload validation and progress display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    #[serde(default = "default_accepted_type")]
    pub accepted_type: String,
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
    #[serde(default = "default_simulate_progress")]
    pub simulate_progress: bool,
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
}

fn default_accepted_type() -> String {
    "application/pdf".to_string()
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_simulate_progress() -> bool {
    true
}

fn default_progress_interval_ms() -> u64 {
    200
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_type: default_accepted_type(),
            max_size_bytes: default_max_size_bytes(),
            simulate_progress: default_simulate_progress(),
            progress_interval_ms: default_progress_interval_ms(),
        }
    }
}

/// Chat session defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Identity sent to the backend; a random one is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

fn default_welcome_message() -> String {
    concat!(
        "Hello! I'm your financial document assistant. ",
        "Upload a PDF statement or report, then ask me anything about it."
    )
    .to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: None,
            welcome_message: default_welcome_message(),
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Log file path; logs go to stderr when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub json: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
