//! `vdemo` binary entrypoint.

mod error;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use error::{CliError, ExitCode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use validation_demo_api::v1::{ErrorTranslator, user_param_schema};
use validation_demo_config::{
    ValidatedAppConfig, load_app_config_std_env, to_pretty_json, to_pretty_toml,
};
use validation_demo_http::{AppState, router};

#[derive(Debug, Parser)]
#[command(
    name = "vdemo",
    version,
    about = "Declarative request validation demo server",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server (default).
    Serve {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print the JSON Schema of the user request body.
    Schema,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config (defaults, file, env).
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShowFormat {
    Json,
    Toml,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { config: None });

    match run(&command) {
        Ok(()) => std::process::ExitCode::from(ExitCode::Ok.as_u8()),
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve { config } => serve(config.as_deref()),
        Commands::Config {
            command: ConfigCommands::Show { config, format },
        } => config_show(config.as_deref(), *format),
        Commands::Schema => schema(),
    }
}

fn config_show(path: Option<&Path>, format: ShowFormat) -> Result<(), CliError> {
    let config = load_app_config_std_env(path)?;
    let output = match format {
        ShowFormat::Json => to_pretty_json(&config)?,
        ShowFormat::Toml => to_pretty_toml(&config)?,
    };
    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

fn schema() -> Result<(), CliError> {
    let mut output = serde_json::to_string_pretty(&user_param_schema())?;
    output.push('\n');
    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

fn serve(path: Option<&Path>) -> Result<(), CliError> {
    let config = load_app_config_std_env(path)?;
    telemetry::init(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve_http(config))
}

async fn serve_http(config: ValidatedAppConfig) -> Result<(), CliError> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        address = %address,
        message_enabled = config.validation.message_enabled,
        "listening"
    );

    let state = AppState::new(ErrorTranslator::new(config.validation.message_enabled));
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
