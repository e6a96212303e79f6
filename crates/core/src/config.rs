//! 配置管理模块
//!
//! 配置文件位于 `<config_dir>/sticker-studio/config.yaml`，不存在时使用默认值。
//! 环境变量 `STICKER_STUDIO_API_BASE` 可覆盖 API 地址。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const API_BASE_ENV: &str = "STICKER_STUDIO_API_BASE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("API 地址无效: {0}")]
    InvalidBaseUrl(String),

    #[error("配置项无效: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
    /// 各 Provider 推荐的去背模型
    pub background_models: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub max_entries: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        let mut background_models = HashMap::new();
        background_models.insert("replicate".to_string(), "rembg".to_string());
        Self {
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
            background_models,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            max_attempts: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_entries: 1000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl StudioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {e}", self.api.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(self.api.base_url.clone()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs 必须大于 0".to_string()));
        }
        if self.polling.interval_ms == 0 || self.polling.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_ms / polling.max_attempts 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 用环境变量覆盖 API 地址
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            let base = base.trim();
            if !base.is_empty() {
                self.api.base_url = base.trim_end_matches('/').to_string();
            }
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sticker-studio")
        .join("config.yaml")
}

pub fn load_config() -> Result<StudioConfig, ConfigError> {
    let mut config = load_config_from(&config_path())?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<StudioConfig, ConfigError> {
    if !path.exists() {
        return Ok(StudioConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_config(config: &StudioConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &StudioConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.polling.interval(), Duration::from_millis(500));
        assert_eq!(config.polling.max_attempts, 20);
        assert_eq!(config.background_models.get("replicate").map(String::as_str), Some("rembg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_default() {
        let temp = tempdir().expect("tempdir");
        let config = load_config_from(&temp.path().join("absent.yaml")).unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested/config.yaml");
        let mut config = StudioConfig::default();
        config.api.base_url = "https://stickers.example/api/v1".to_string();
        config.polling.max_attempts = 5;

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "polling:\n  interval_ms: 100\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.polling.interval_ms, 100);
        assert_eq!(config.polling.max_attempts, 20);
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StudioConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl(_))));

        let mut config = StudioConfig::default();
        config.polling.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
