use thiserror::Error;

/// Every failure the front end can run into.
///
/// The `Display` text is what the notification banner shows, so backend
/// messages pass through untouched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Gateway { message: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please sign in first.")]
    NotAuthenticated,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        AppError::Gateway {
            message: message.into(),
        }
    }
}
