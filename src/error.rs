type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RteError {
    /// A request targeted a service no credentials were supplied for.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input or a provider payload failed validation.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Any non-200 answer from the token or data endpoints.
    #[error("Request failed with status code {status}: {description} (Error: {error})")]
    Auth {
        status: u16,
        description: String,
        error: String,
    },

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking task behind the async client failed to complete.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl RteError {
    /// Validation failure without an underlying cause.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Validation failure that keeps the underlying cause for diagnostics.
    pub fn validation_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Validation {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// HTTP status code carried by an [`RteError::Auth`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RteError>;
