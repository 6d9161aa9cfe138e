use salvo::http::StatusCode;
use salvo::writing::{Json, Scribe};
use thiserror::Error;

use labmath_core::error::CoreError;
use labmath_db::error::DbError;
use labmath_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl AppError {
    /// ## Summary
    /// The HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::ServiceError(ServiceError::ValidationError(_))
            | Self::CoreError(CoreError::UnknownRecordKind(_)) => StatusCode::BAD_REQUEST,
            Self::ServiceError(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) | Self::ServiceError(ServiceError::NotAuthenticated) => {
                StatusCode::UNAUTHORIZED
            }
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::DatabaseError(DbError::PoolError(_))
            | Self::ServiceError(ServiceError::DatabaseError(DbError::PoolError(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// The message shown to the client. Server-side failures are reported
    /// generically; their details only go to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) | Self::UpstreamError(message) => message.clone(),
            Self::ServiceError(
                ServiceError::ValidationError(message) | ServiceError::NotFound(message),
            ) => message.clone(),
            Self::Unauthorized(message) => (*message).to_string(),
            Self::ServiceError(ServiceError::NotAuthenticated) => {
                "Authentication required".to_string()
            }
            Self::CoreError(err @ CoreError::UnknownRecordKind(_)) => err.to_string(),
            _ if self.status_code() == StatusCode::SERVICE_UNAVAILABLE => {
                "Database unavailable".to_string()
            }
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl Scribe for AppError {
    fn render(self, res: &mut salvo::Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, %status, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse {
            success: false,
            message: self.public_message(),
        }));
    }
}
