//! Error types for statement execution

use thiserror::Error;

/// Errors raised while executing a statement
#[derive(Error, Debug)]
pub enum Error {
    /// A terminal expecting exactly one record saw none or several
    #[error("expected exactly one record, got {actual}")]
    Cardinality { actual: usize },

    /// A record mapper rejected a record
    #[error("failed to map record")]
    Mapping(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The session provider or the underlying driver failed
    #[error("session error: {0}")]
    Session(String),

    /// A driver-native error, passed through unmodified
    #[error("driver error: {0}")]
    Runner(Box<dyn std::error::Error + Send + Sync>),

    /// The statement could not be rendered
    #[error(transparent)]
    Statement(#[from] graphforge::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
