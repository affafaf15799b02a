use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Login response did not contain an access token")]
    MissingToken,

    #[error("Question fetch failed: {0}")]
    QuestionFetch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthRejected(_) => "AUTH_REJECTED",
            AppError::MissingToken => "MISSING_TOKEN",
            AppError::QuestionFetch(_) => "QUESTION_FETCH_FAILED",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Backend(_) => "BACKEND_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Cancelled => "CANCELLED",
        }
    }

    /// Whether this error should be surfaced to the user. Everything else is
    /// absorbed at the controller/engine boundary and at most logged.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::AuthRejected(_)
                | AppError::MissingToken
                | AppError::QuestionFetch(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Network(format!("request timed out: {}", err))
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
