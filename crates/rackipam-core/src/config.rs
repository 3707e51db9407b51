use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub instance: InstanceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_listen")]
    pub listen: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: default_api_listen(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Settings for bulk address generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Records written per store round-trip
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Default for requests that do not say whether to reserve the gateway
    #[serde(default = "default_true")]
    pub reserve_gateway: bool,
    #[serde(default = "default_gateway_name")]
    pub gateway_name: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            reserve_gateway: true,
            gateway_name: default_gateway_name(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_api_listen() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("/data/rackipam.redb")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_batch_size() -> usize {
    500
}
fn default_gateway_name() -> String {
    rackipam_cidr::DEFAULT_GATEWAY_NAME.to_string()
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::Error::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::error::Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.provisioning.batch_size == 0 {
            return Err(crate::error::Error::Config(
                "provisioning.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
