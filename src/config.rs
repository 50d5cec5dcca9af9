use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the API server
    #[serde(default = "default_host")]
    pub host: String,
    /// API server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized model artifact
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Optional URL to fetch the artifact from when the file is absent
    #[serde(default)]
    pub url: Option<String>,
    /// Download timeout in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_model_path() -> String {
    "models/model_artifacts.json".to_string()
}

fn default_download_timeout() -> u64 {
    300
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            url: None,
            download_timeout_secs: default_download_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of workers accepted per batch request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_max_batch_size() -> usize {
    1000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("model.path", "models/model_artifacts.json")?
            .set_default("model.download_timeout_secs", 300)?
            .set_default("limits.max_batch_size", 1000)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("GIGSTRESS_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (GIGSTRESS_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("GIGSTRESS")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.model.path.trim().is_empty() {
            errors.push("model.path must not be empty".to_string());
        }

        if self.limits.max_batch_size == 0 {
            errors.push("limits.max_batch_size must be at least 1".to_string());
        }

        if self.model.download_timeout_secs == 0 {
            errors.push("model.download_timeout_secs must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
