//! Workspace-level error type for harness startup and timing syscalls.

use rover_common::config::ConfigError;
use rover_common::time::TimeError;
use thiserror::Error;

/// Errors surfaced by the coordinator and the RT machinery.
///
/// Everything here is fatal at startup; once the task set is running the
/// only mid-run anomalies are timing (recorded as jitter, never an error)
/// and malformed operator input (discarded locally).
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration loading or validation failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Monotonic clock syscall failed.
    #[error("clock error: {0}")]
    Time(#[from] TimeError),

    /// Log file creation or flush failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A task thread could not be created.
    #[error("failed to spawn task '{name}': {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    /// RT system call failed during startup (rt feature only).
    #[error("RT setup error: {0}")]
    RtSetup(String),
}
