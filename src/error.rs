use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Malformed timestamp: {0}")]
    #[diagnostic(
        code(tempo::malformed_timestamp),
        help("Use a local ISO-8601 timestamp such as 2025-04-15T10:00:00")
    )]
    MalformedTimestamp(String),

    #[error("Invalid date format: {0}. Use YYYY-MM-DD")]
    #[diagnostic(code(tempo::invalid_date))]
    InvalidDate(String),

    #[error("Invalid duration: {0}. Duration must be positive")]
    #[diagnostic(code(tempo::invalid_duration))]
    InvalidDuration(String),

    #[error("Invalid event: {0}")]
    #[diagnostic(code(tempo::invalid_event))]
    InvalidEvent(String),

    #[error("{0} not found")]
    #[diagnostic(code(tempo::not_found))]
    NotFound(String),

    #[error("{0}")]
    #[diagnostic(code(tempo::conflict))]
    Conflict(String),

    #[error("{0}")]
    #[diagnostic(code(tempo::validation))]
    Validation(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(tempo::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tempo::config))]
    Config(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(tempo::store))]
    Store(String),

    #[error(transparent)]
    #[diagnostic(code(tempo::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(tempo::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(tempo::other))]
    Other(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedTimestamp(_)
                | Error::InvalidDate(_)
                | Error::InvalidDuration(_)
                | Error::InvalidEvent(_)
                | Error::NotFound(_)
                | Error::Conflict(_)
                | Error::Validation(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type TempoResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid value for environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create storage errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
