use thiserror::Error;

/// domainstack error types
#[derive(Error, Debug)]
pub enum DomainstackError {
    /// A service node was built without a usable name
    #[error("service must have a non-empty name")]
    EmptyServiceName,

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Top-level document could not be read as YAML
    #[error("document error: {0}")]
    Document(String),

    /// Provider directory source problem
    #[error("directory error: {0}")]
    Directory(String),
}

/// Result type alias for domainstack
pub type Result<T> = std::result::Result<T, DomainstackError>;
