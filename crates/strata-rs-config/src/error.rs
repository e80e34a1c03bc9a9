//! Error types for the configuration store.

use thiserror::Error;

/// Errors returned by configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No marshaller serves the requested file extension.
    #[error("Config file format `{0}` is not supported.")]
    UnsupportedExtension(String),
    /// Reading configuration from a file failed.
    #[error("{0}")]
    Read(String),
    /// Writing configuration to a file failed.
    #[error("{0}")]
    Write(String),
    /// A registered validator rejected a value.
    #[error("invalid value for `{key}`: {message}")]
    Validation { key: String, message: String },
    /// The preferred value source is not recognized.
    #[error("Preferred Source `{0}` is not supported.")]
    UnsupportedSource(String),
    /// A marshaller's backing library is not available.
    #[error("{0}")]
    DependencyLoad(String),
    /// An operation was called with arguments it cannot honor.
    #[error("{0}")]
    InvalidArgument(String),
    /// A composite key resolved to no segments.
    #[error("key must contain at least one segment")]
    InvalidKey,
    /// Raw filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Key carried by a validation failure, if this is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::Validation { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Failure reported by a marshaller while converting content.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MarshalError(pub String);

impl MarshalError {
    /// Build an error from anything displayable.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}
