//! Application configuration schema, defaults, and validation.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation reuses the request-validation derive and maps violations to
//!   `ErrorEnvelope`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validation_demo_shared::{ErrorCode, ErrorEnvelope, Scenario, Validate as _, Violations};
use validation_demo_validate_derive::Validate;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_FILTER: &str = "info";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[constraint(nested)]
    pub server: ServerConfig,
    /// Validation message settings.
    pub validation: ValidationConfig,
    /// Log output settings.
    #[constraint(nested)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Bind address.
    #[constraint(not_blank)]
    pub host: String,
    /// Bind port.
    #[constraint(range(min = 1, max = 65535))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

/// Validation message settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidationConfig {
    /// Include `field: message` details in `PARAM_INVALID` responses.
    pub message_enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            message_enabled: true,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive.
    #[constraint(not_blank)]
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Config spelling of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

impl AppConfig {
    /// Validate the config.
    pub fn validate_config(self) -> Result<ValidatedAppConfig, ConfigSchemaError> {
        self.validate(Scenario::Create)
            .map_err(|violations| ConfigSchemaError { violations })?;
        Ok(ValidatedAppConfig { raw: self })
    }
}

/// Config that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAppConfig {
    raw: AppConfig,
}

impl ValidatedAppConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &AppConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> AppConfig {
        self.raw
    }
}

impl AsRef<AppConfig> for ValidatedAppConfig {
    fn as_ref(&self) -> &AppConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedAppConfig {
    type Target = AppConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Config values that violate the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid config: {violations}")]
pub struct ConfigSchemaError {
    violations: Violations,
}

impl ConfigSchemaError {
    /// The offending fields and their messages.
    #[must_use]
    pub const fn violations(&self) -> &Violations {
        &self.violations
    }
}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let fields = error
            .violations
            .iter()
            .map(validation_demo_shared::Violation::path)
            .collect::<Vec<_>>()
            .join(",");
        Self::expected(ErrorCode::new("config", "invalid_config"), error.to_string())
            .with_metadata("fields", fields)
    }
}

/// Parse and validate a JSON config.
pub fn parse_app_config_json(input: &str) -> Result<ValidatedAppConfig, ErrorEnvelope> {
    parse_json_unvalidated(input)?
        .validate_config()
        .map_err(Into::into)
}

/// Parse and validate a TOML config.
pub fn parse_app_config_toml(input: &str) -> Result<ValidatedAppConfig, ErrorEnvelope> {
    parse_toml_unvalidated(input)?
        .validate_config()
        .map_err(Into::into)
}

pub(crate) fn parse_json_unvalidated(input: &str) -> Result<AppConfig, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
        .with_metadata("source", "config")
    })
}

pub(crate) fn parse_toml_unvalidated(input: &str) -> Result<AppConfig, ErrorEnvelope> {
    toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
        .with_metadata("source", "config")
    })
}
