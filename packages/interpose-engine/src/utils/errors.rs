// packages/interpose-engine/src/utils/errors.rs
//! Engine error types
//!
//! Every precondition violation is raised synchronously at the call site
//! that violated it. Nothing is retried and no partially-installed wrapper
//! is left behind.

use thiserror::Error;

/// Errors raised by the interception engine and its entities
#[derive(Error, Debug)]
pub enum EngineError {
    /// Attach requested for a name that does not resolve on the entity
    #[error("Unknown operation `{operation}` on {owner}")]
    UnknownOperation { owner: String, operation: String },

    /// A stub was requested without a replacement behavior
    #[error("No replacement behavior supplied for stub of `{0}`")]
    MissingBehavior(String),

    /// Restore without a name while several operations are intercepted
    #[error("Operation name to be restored is required on {owner}, intercepted: {}", .candidates.join(", "))]
    AmbiguousTarget { owner: String, candidates: Vec<String> },

    /// Restore target could not be determined or carries no interception
    #[error("Nothing to restore: {0}")]
    MissingTarget(String),

    /// Hook kind outside `before`, `after`, `stub`
    #[error("Invalid hook kind: {0}")]
    InvalidHookKind(String),

    /// Ordinary operations may not use the wrapper member namespace
    #[error("Operation name `{0}` uses the reserved wrapper prefix")]
    ReservedName(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure raised inside an operation, hook or stub body
    #[error(transparent)]
    Operation(#[from] anyhow::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
