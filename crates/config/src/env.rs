//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or malformed
//! fails the load instead of being ignored.

use crate::schema::{AppConfig, LogFormat, ValidatedAppConfig};
use std::collections::BTreeMap;
use validation_demo_shared::{ErrorCode, ErrorEnvelope};

/// Env var: server bind host.
pub const ENV_SERVER_HOST: &str = "VDEMO_SERVER_HOST";
/// Env var: server bind port.
pub const ENV_SERVER_PORT: &str = "VDEMO_SERVER_PORT";
/// Env var: include validation messages in responses.
pub const ENV_VALIDATION_MSG_ENABLE: &str = "VDEMO_VALIDATION_MSG_ENABLE";
/// Env var: log filter directive.
pub const ENV_LOG_FILTER: &str = "VDEMO_LOG_FILTER";
/// Env var: log output format.
pub const ENV_LOG_FORMAT: &str = "VDEMO_LOG_FORMAT";

const ALL_VARS: [&str; 5] = [
    ENV_SERVER_HOST,
    ENV_SERVER_PORT,
    ENV_VALIDATION_MSG_ENABLE,
    ENV_LOG_FILTER,
    ENV_LOG_FORMAT,
];

/// Parsed env overrides. `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppEnv {
    /// `VDEMO_SERVER_HOST`
    pub server_host: Option<String>,
    /// `VDEMO_SERVER_PORT`
    pub server_port: Option<u16>,
    /// `VDEMO_VALIDATION_MSG_ENABLE`
    pub validation_message_enabled: Option<bool>,
    /// `VDEMO_LOG_FILTER`
    pub log_filter: Option<String>,
    /// `VDEMO_LOG_FORMAT`
    pub log_format: Option<LogFormat>,
}

impl AppEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            server_host: parse_optional_trimmed_string(map, ENV_SERVER_HOST)?,
            server_port: parse_optional_u16(map, ENV_SERVER_PORT)?,
            validation_message_enabled: parse_optional_bool(map, ENV_VALIDATION_MSG_ENABLE)?,
            log_filter: parse_optional_trimmed_string(map, ENV_LOG_FILTER)?,
            log_format: parse_optional_log_format(map, ENV_LOG_FORMAT)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: AppConfig,
    env: &AppEnv,
) -> Result<ValidatedAppConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(host) = &env.server_host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = env.server_port {
        config.server.port = port;
    }
    if let Some(enabled) = env.validation_message_enabled {
        config.validation.message_enabled = enabled;
    }
    if let Some(filter) = &env.log_filter {
        config.logging.filter.clone_from(filter);
    }
    if let Some(format) = env.log_format {
        config.logging.format = format;
    }

    config.validate_config().map_err(Into::into)
}

/// Errors raised while parsing env overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvParseError {
    /// Env var was set but empty.
    #[error("{var} must be non-empty")]
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    #[error("{var} must be a boolean")]
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    #[error("{var} must be an integer")]
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    #[error("{var} has an unsupported value")]
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
        }
    }
}

fn present<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<(&'a str, &'a String)>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some((trimmed, raw)))
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    Ok(present(map, var)?.map(|(trimmed, _)| trimmed.to_owned()))
}

fn parse_optional_u16(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u16>, EnvParseError> {
    let Some((trimmed, raw)) = present(map, var)? else {
        return Ok(None);
    };
    trimmed
        .parse::<u16>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some((trimmed, raw)) = present(map, var)? else {
        return Ok(None);
    };
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

fn parse_optional_log_format(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogFormat>, EnvParseError> {
    let Some((trimmed, raw)) = present(map, var)? else {
        return Ok(None);
    };
    trimmed
        .parse::<LogFormat>()
        .map(Some)
        .map_err(|()| EnvParseError::InvalidEnum {
            var,
            value: raw.clone(),
        })
}
