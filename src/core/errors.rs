/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export domain errors from their modules
pub use crate::memory::MemoryError;
pub use crate::task::TaskError;

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variable or config file for a typo.")
    )]
    InvalidValue { key: String, value: String },

    #[error("Memory pool size must be at least 1 byte")]
    #[diagnostic(code(config::empty_pool))]
    EmptyPool,

    #[error("Tick interval {millis}ms out of range ({min}ms..={max}ms)")]
    #[diagnostic(
        code(config::tick_interval),
        help("Use an interval between 1ms and 60s.")
    )]
    TickInterval { millis: u64, min: u64, max: u64 },
}

/// Top-level simulator error
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SimError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;
