//! Error types for the crate edges (config files, high score storage)
//!
//! The simulation itself has no error paths: terminal conditions are state
//! transitions and bad input is ignored.

/// Errors from loading, saving or validating a `TunnelConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the config file to disk
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse or serialize JSON
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// Config parsed but the values cannot drive a session
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from a high score store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read high score: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write high score: {0}")]
    Write(#[source] std::io::Error),

    #[error("malformed high score file: {0}")]
    Parse(#[source] serde_json::Error),
}
