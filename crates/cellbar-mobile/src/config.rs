#![forbid(unsafe_code)]

//! Interactor configuration.
//!
//! [`MobileIconConfig`] is a plain struct with serde support. Values come
//! from, in increasing priority:
//!
//! 1. `Default`
//! 2. JSON ([`MobileIconConfig::from_json_str`])
//! 3. Environment ([`MobileIconConfig::with_env_overrides`])
//!
//! # Environment Variables
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `CELLBAR_SATELLITE_SUPPORT` | `1/true/yes/on` or `0/false/no/off` |
//! | `CELLBAR_TABLE_LOG_CAPACITY` | Positive integer row count |

use std::fmt;

use cellbar_runtime::TableLogConfig;
use serde::{Deserialize, Serialize};

use crate::carrier_name::CarrierNameConfig;

pub const ENV_SATELLITE_SUPPORT: &str = "CELLBAR_SATELLITE_SUPPORT";
pub const ENV_TABLE_LOG_CAPACITY: &str = "CELLBAR_TABLE_LOG_CAPACITY";

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The input was not valid JSON for the expected shape.
    Parse(String),
    /// An environment variable held an unusable value.
    InvalidEnv { var: &'static str, value: String },
    /// A field failed validation.
    Invalid { field: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::InvalidEnv { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            Self::Invalid { field, message } => {
                write!(f, "invalid config field {field}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings of one connection's interactor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileIconConfig {
    /// When false the connection is never treated as non-terrestrial.
    pub carrier_enabled_satellite: bool,
    pub table_log: TableLogConfig,
    pub carrier_name: CarrierNameConfig,
}

impl Default for MobileIconConfig {
    fn default() -> Self {
        Self {
            carrier_enabled_satellite: true,
            table_log: TableLogConfig::default(),
            carrier_name: CarrierNameConfig::default(),
        }
    }
}

impl MobileIconConfig {
    #[must_use]
    pub fn with_satellite_support(mut self, enabled: bool) -> Self {
        self.carrier_enabled_satellite = enabled;
        self
    }

    #[must_use]
    pub fn with_table_log(mut self, table_log: TableLogConfig) -> Self {
        self.table_log = table_log;
        self
    }

    #[must_use]
    pub fn with_carrier_name(mut self, carrier_name: CarrierNameConfig) -> Self {
        self.carrier_name = carrier_name;
        self
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_log.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "table_log.capacity",
                message: "must be at least 1".into(),
            });
        }
        if self.carrier_name.show_customize_name && self.carrier_name.separator.is_empty() {
            return Err(ConfigError::Invalid {
                field: "carrier_name.separator",
                message: "must not be empty when customization is enabled".into(),
            });
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using a custom environment lookup.
    pub fn with_env_overrides_from<F>(mut self, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get_env(ENV_SATELLITE_SUPPORT) {
            self.carrier_enabled_satellite =
                env_flag(&value).ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_SATELLITE_SUPPORT,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = get_env(ENV_TABLE_LOG_CAPACITY) {
            let capacity = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_TABLE_LOG_CAPACITY,
                    value: value.clone(),
                })?;
            self.table_log.capacity = capacity;
        }
        Ok(self)
    }
}

fn env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults() {
        let config = MobileIconConfig::default();
        assert!(config.carrier_enabled_satellite);
        assert!(config.table_log.enabled);
        assert_eq!(config.table_log.capacity, 100);
        assert!(!config.carrier_name.show_customize_name);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            MobileIconConfig::from_json_str(r#"{"carrier_enabled_satellite": false}"#).unwrap();
        assert!(!config.carrier_enabled_satellite);
        assert_eq!(config.table_log, TableLogConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let config = MobileIconConfig::default()
            .with_satellite_support(false)
            .with_table_log(TableLogConfig::default().with_capacity(16))
            .with_carrier_name(CarrierNameConfig::default().with_carrier("310260", "Home"));
        let json = config.to_json_string().unwrap();
        assert_eq!(MobileIconConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = MobileIconConfig::from_json_str(r#"{"table_log": {"capacity": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "table_log.capacity", .. }));
    }

    #[test]
    fn rejects_bad_json() {
        let err = MobileIconConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn env_overrides_apply() {
        let pairs = [
            (ENV_SATELLITE_SUPPORT, "off"),
            (ENV_TABLE_LOG_CAPACITY, " 32 "),
        ];
        let config = MobileIconConfig::default()
            .with_env_overrides_from(env(&pairs))
            .unwrap();
        assert!(!config.carrier_enabled_satellite);
        assert_eq!(config.table_log.capacity, 32);
    }

    #[test]
    fn env_overrides_reject_garbage() {
        let pairs = [(ENV_SATELLITE_SUPPORT, "maybe")];
        let err = MobileIconConfig::default()
            .with_env_overrides_from(env(&pairs))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_SATELLITE_SUPPORT,
                value: "maybe".into()
            }
        );

        let pairs = [(ENV_TABLE_LOG_CAPACITY, "0")];
        assert!(
            MobileIconConfig::default()
                .with_env_overrides_from(env(&pairs))
                .is_err()
        );
    }

    #[test]
    fn absent_env_changes_nothing() {
        let config = MobileIconConfig::default()
            .with_env_overrides_from(|_| None)
            .unwrap();
        assert_eq!(config, MobileIconConfig::default());
    }
}
