//! CLI command implementations

pub mod add;
pub mod auth;
pub mod catalog;
pub mod edit;
pub mod list;
pub mod logs;
pub mod remove;
pub mod sample;
pub mod show;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use subscribe_core::{EntryPoint, Error, LoggingService, OperationResult, SubscribeContext};

use crate::output;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SUBSCRIBE_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Record that a command ran, ignoring any errors (logging should never break the app)
pub fn log_command(command: &str) {
    if let Some(logger) = get_logger() {
        let _ = logger.log_command(command);
    }
}

/// Record a failed command by error kind, ignoring any errors
pub fn log_failure(command: &str, err: &anyhow::Error) {
    if let Some(logger) = get_logger() {
        let _ = logger.log_error(command, error_kind(err));
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".subscribe"))
}

/// Get or create subscribe context
pub fn get_context() -> Result<SubscribeContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    SubscribeContext::new(&data_dir).context("Failed to open subscription store")
}

/// Short name of a failure for the event log. Messages are not logged
/// since they can echo user input.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(_)) => "validation",
        Some(Error::NotFound(_)) => "not_found",
        Some(Error::Persistence(_)) => "persistence",
        Some(Error::Config(_)) => "config",
        Some(Error::Io(_)) => "io",
        Some(Error::Json(_)) => "json",
        None => "other",
    }
}

/// Turn a missing record into a notice.
///
/// Returns `Ok(None)` after printing the notice, so the command can stop
/// without failing the process.
pub fn found_or_notice<T>(result: subscribe_core::Result<T>, json: bool) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            if json {
                let notice: OperationResult<()> = OperationResult::fail(e.to_string());
                println!("{}", serde_json::to_string_pretty(&notice)?);
            } else {
                output::warning(&e.to_string());
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// First characters of an ID, as shown in tables
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}
