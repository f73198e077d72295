//! Config loading helpers (env + file).
//!
//! Precedence (highest wins): env overrides, config file, defaults.

use crate::schema::{parse_json_unvalidated, parse_toml_unvalidated};
use crate::{AppConfig, AppEnv, ValidatedAppConfig, apply_env_overrides};
use std::path::Path;
use tracing::debug;
use validation_demo_shared::{ErrorCode, ErrorEnvelope, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the app config from an optional file path and parsed env overrides.
pub fn load_app_config_from_path(
    config_path: Option<&Path>,
    env: &AppEnv,
) -> Result<ValidatedAppConfig> {
    let config = match config_path {
        None => AppConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            debug!(path = %path.display(), format = ?format, "loading config file");
            parse_config_unvalidated(&config_text, format)?
        },
    };

    // env is applied last and also validates the resulting config.
    apply_env_overrides(config, env)
}

/// Load the app config from std env and an optional file path.
pub fn load_app_config_std_env(
    config_path: Option<&Path>,
) -> Result<ValidatedAppConfig> {
    let env = AppEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_app_config_from_path(config_path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &AppConfig) -> Result<String> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &AppConfig) -> Result<String> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<AppConfig> {
    match format {
        ConfigFormat::Json => parse_json_unvalidated(input),
        ConfigFormat::Toml => parse_toml_unvalidated(input),
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config file format",
        )
        .with_metadata("extension", other.to_string())),
    }
}
