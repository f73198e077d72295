//! # validation-demo-config
//!
//! Configuration schema, env overrides and loading for the server binary.
//! This crate depends on `shared` and `validate-derive` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    AppEnv, ENV_LOG_FILTER, ENV_LOG_FORMAT, ENV_SERVER_HOST, ENV_SERVER_PORT,
    ENV_VALIDATION_MSG_ENABLE, EnvParseError, apply_env_overrides,
};
pub use load::{
    load_app_config_from_path, load_app_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    AppConfig, ConfigSchemaError, LogFormat, LoggingConfig, ServerConfig, ValidatedAppConfig,
    ValidationConfig, parse_app_config_json, parse_app_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
