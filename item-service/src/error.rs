//! Error types and HTTP response conversion

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::Level;

use crate::repository::{PageError, RepositoryError, RepositoryErrorKind, SortError};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Structured repository error with operation context
    #[error("{0}")]
    Repository(RepositoryError),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(Box<jsonwebtoken::errors::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed validation (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl Error {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Repository(e) => repository_status(e.kind),
            Error::Jwt(_) | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) | Error::ValidationError(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn repository_status(kind: RepositoryErrorKind) -> StatusCode {
    match kind {
        RepositoryErrorKind::NotFound => StatusCode::NOT_FOUND,
        RepositoryErrorKind::AlreadyExists | RepositoryErrorKind::VersionConflict => {
            StatusCode::CONFLICT
        }
        RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Store failures are errors; outcomes the caller caused are warnings
fn repository_log_level(kind: RepositoryErrorKind) -> Level {
    if repository_status(kind).is_server_error() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::with_code(status, "CONFIG_ERROR", "Service is misconfigured")
            }

            Error::Repository(ref e) => {
                // Log with structured context
                macro_rules! log_repository_error {
                    ($level:ident) => {
                        tracing::$level!(
                            operation = %e.operation,
                            kind = %e.kind,
                            entity_type = ?e.entity_type,
                            entity_id = ?e.entity_id,
                            retriable = e.is_retriable(),
                            "Repository error: {}", e.message
                        )
                    };
                }
                if repository_log_level(e.kind) == Level::ERROR {
                    log_repository_error!(error);
                } else {
                    log_repository_error!(warn);
                }

                let code = format!("REPOSITORY_{}", e.kind.to_string().to_uppercase());

                // User-facing message (don't expose internal details)
                let user_message = match e.kind {
                    RepositoryErrorKind::NotFound => "Resource not found",
                    RepositoryErrorKind::AlreadyExists => "Resource already exists",
                    RepositoryErrorKind::VersionConflict => {
                        "Resource was modified concurrently, reload and retry"
                    }
                    RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                        "Item store is unavailable"
                    }
                    _ => "An internal error occurred",
                };

                ErrorResponse::with_code(status, code, user_message)
            }

            Error::Jwt(e) => ErrorResponse::with_code(status, "INVALID_TOKEN", e.to_string()),

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code(status, "IO_ERROR", "An internal error occurred")
            }

            Error::Unauthorized(msg) => ErrorResponse::with_code(status, "UNAUTHORIZED", msg),

            Error::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                ErrorResponse::with_code(status, "NOT_FOUND", msg)
            }

            Error::BadRequest(msg) => ErrorResponse::with_code(status, "BAD_REQUEST", msg),

            Error::ValidationError(msg) => {
                ErrorResponse::with_code(status, "VALIDATION_ERROR", msg)
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::with_code(status, "INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Jwt(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        Error::Repository(err)
    }
}

impl From<SortError> for Error {
    fn from(err: SortError) -> Self {
        Error::BadRequest(err.to_string())
    }
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        Error::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        Error::BadRequest(err.body_text())
    }
}
