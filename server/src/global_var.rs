use crate::config::EnvVar;
use crate::utilities::AsyncLogger;
use crate::utilities::logger::Logger;
use std::sync::{LazyLock, OnceLock};

/// Backing cell for the process-wide logger. Set once during startup.
pub static LOGGER_CELL: OnceLock<AsyncLogger> = OnceLock::new();

/// Deref shim over LOGGER_CELL so call sites can write LOGGER.info(...).
pub static LOGGER: Logger = Logger;

/// Resolved runtime configuration. Set once during startup.
pub static ENV_VAR: OnceLock<EnvVar> = OnceLock::new();

/// Mirror log lines to stdout and enable debug-level records.
pub static DEBUG_MODE: LazyLock<bool> = LazyLock::new(|| {
    let env_var = std::env::var("DEBUG_MODE").unwrap_or_default();
    env_var == "1" || env_var.eq_ignore_ascii_case("true")
});
