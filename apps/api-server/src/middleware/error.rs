//! Error handling - JSON error envelope for every failure.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use blog_core::error::{DomainError, RepoError};
use blog_core::ValidationErrors;
use blog_shared::{ErrorResponse, FieldErrorResponse};

use crate::observability::current_request_id;

/// Application-level error type that converts to JSON error responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request: bad JSON, bad query string.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => {
                let fields = errors
                    .errors()
                    .iter()
                    .map(|e| FieldErrorResponse {
                        field: e.field.clone(),
                        message: e.message.clone(),
                    })
                    .collect();
                ErrorResponse::bad_request("Validation failed").with_fields(fields)
            }
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        let error = match current_request_id() {
            Some(id) => error.with_request_id(id),
            None => error,
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::PermissionDenied => AppError::Forbidden,
            DomainError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::FieldError;

    #[test]
    fn test_domain_error_status_codes() {
        let cases = [
            (DomainError::not_found("Post", 1), StatusCode::NOT_FOUND),
            (DomainError::PermissionDenied, StatusCode::FORBIDDEN),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Duplicate("taken".into()), StatusCode::CONFLICT),
            (
                DomainError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Validation(FieldError::new("title", "required").into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (domain, status) in cases {
            assert_eq!(AppError::from(domain).status_code(), status);
        }
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = AppError::from(DomainError::not_found("Comment", 9));
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Comment not found"));
    }
}
