//! Error types shared by the configuration layer and the output sinks

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of a single outbound publish or indicator call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("sink is full")]
    Full,
    #[error("sink is disconnected")]
    Disconnected,
    #[error("sink rejected the message: {0}")]
    Rejected(String),
}
