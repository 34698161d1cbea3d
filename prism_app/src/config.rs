use prism_runtime::SyncConfig;
use std::{fs, path::Path};
use thiserror::Error;
use toml::Value;

pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{0}`: {1}")]
    InvalidField(&'static str, String),
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Every section is optional; fields left out keep their defaults.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let value: Value = contents.parse::<Value>()?;
    let mut config = AppConfig::default();

    if let Some(sync) = value.get("sync") {
        let sync = sync
            .as_table()
            .ok_or_else(|| ConfigError::InvalidField("sync", "expected a table".to_string()))?;
        if let Some(preset) = sync.get("color_preset") {
            let preset = preset.as_str().ok_or_else(|| {
                ConfigError::InvalidField("sync.color_preset", "expected a string".to_string())
            })?;
            if preset.trim().is_empty() {
                return Err(ConfigError::InvalidField(
                    "sync.color_preset",
                    "must not be empty".to_string(),
                ));
            }
            config.sync = config.sync.with_color_preset(preset.trim());
        }
        if let Some(linear) = sync.get("linear_interpolation") {
            let linear = linear.as_bool().ok_or_else(|| {
                ConfigError::InvalidField(
                    "sync.linear_interpolation",
                    "expected true or false".to_string(),
                )
            })?;
            config.sync = config.sync.with_linear_interpolation(linear);
        }
    }

    if let Some(log) = value.get("log") {
        let level = log
            .as_table()
            .ok_or_else(|| ConfigError::InvalidField("log", "expected a table".to_string()))?
            .get("level")
            .ok_or(ConfigError::MissingField("log.level"))?
            .as_str()
            .ok_or_else(|| ConfigError::InvalidField("log.level", "expected a string".to_string()))?
            .to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidField(
                "log.level",
                format!("`{level}` is not one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        config.log_level = level;
    }

    Ok(config)
}
