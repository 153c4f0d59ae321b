use thiserror::Error;
pub use url::ParseError as UrlParseError;

use crate::models::ApiFailure;

/// Error types for the environment service client and the local shell editor.
#[derive(Error, Debug)]
pub enum EnvError {
    /// The service answered with an error envelope.
    #[error("API error {code}: {message}{}", .error.as_deref().map(|e| format!(" ({e})")).unwrap_or_default())]
    Api {
        code: u16,
        message: String,
        error: Option<String>,
    },

    /// A successful envelope carried no `data`.
    #[error("No data returned from API")]
    MissingData,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error parsing URL.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] UrlParseError),

    /// The API endpoint/path string is invalid.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error serializing or deserializing JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Reading or writing a shell file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No variable is tracked at the given line.
    #[error("Environment variable not found at line {0}")]
    EnvNotFound(u64),

    #[error("Environment variable already exists: {0}")]
    EnvAlreadyExists(String),

    /// A variable name that cannot appear in an `export` statement.
    #[error("Invalid environment variable name: {0:?}")]
    InvalidKey(String),

    /// A value segment that would break out of its `export` line.
    #[error("Invalid environment variable value: {0:?}")]
    InvalidValue(String),

    /// An edit was requested before any config file was loaded.
    #[error("No config file loaded")]
    NoConfigLoaded,
}

impl EnvError {
    /// The status code a service reports this error under.
    pub fn code(&self) -> u16 {
        match self {
            EnvError::Api { code, .. } => *code,
            EnvError::EnvNotFound(_)
            | EnvError::EnvAlreadyExists(_)
            | EnvError::InvalidKey(_)
            | EnvError::InvalidValue(_)
            | EnvError::InvalidEndpoint(_) => 400,
            EnvError::NoConfigLoaded => 409,
            EnvError::ConfigurationError(_) => 400,
            EnvError::HttpError(e) => e.status().map(|s| s.as_u16()).unwrap_or(503),
            EnvError::MissingData
            | EnvError::UrlParseError(_)
            | EnvError::SerializationError(_)
            | EnvError::Io(_) => 500,
        }
    }
}

impl From<ApiFailure> for EnvError {
    fn from(failure: ApiFailure) -> Self {
        EnvError::Api {
            code: failure.code,
            message: failure.message,
            error: failure.error,
        }
    }
}

/// Result type for environment service operations.
pub type EnvResult<T> = Result<T, EnvError>;
