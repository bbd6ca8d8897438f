//! HTTP error mapping
//!
//! Every failure leaves the API as the standard envelope with a stable code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use tour_core::DomainError;

use crate::response::ApiResponse;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Missing, malformed, or expired bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated with the wrong role
    #[error("{0}")]
    Forbidden(String),

    /// Request body, path, or query could not be parsed
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => domain_status(e),
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => e.code(),
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::TourNotFound
        | DomainError::TourNotFoundNamed(_)
        | DomainError::TouristNotFound
        | DomainError::ProblemNotFound
        | DomainError::UserNotFound(_)
        | DomainError::NotBlocked(_) => StatusCode::NOT_FOUND,
        DomainError::NotOwner(_) => StatusCode::FORBIDDEN,
        DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        DomainError::AccountLocked(_) => StatusCode::LOCKED,
        DomainError::ScheduleConflict | DomainError::CannotUnblock { .. } => StatusCode::CONFLICT,
        e if e.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = if status.is_server_error() {
            tracing::error!("{} {}: {}", status, code, self);
            INTERNAL_MESSAGE.to_string()
        } else {
            tracing::warn!("{} {}: {}", status, code, self);
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Domain(errors.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_status_mapping() {
        let cases = [
            (DomainError::TourNotFound, StatusCode::NOT_FOUND),
            (DomainError::NotBlocked("bob".into()), StatusCode::NOT_FOUND),
            (DomainError::not_owner(), StatusCode::FORBIDDEN),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::AccountLocked("locked".into()), StatusCode::LOCKED),
            (DomainError::ScheduleConflict, StatusCode::CONFLICT),
            (
                DomainError::CannotUnblock { username: "bob".into(), block_count: 3, max: 3 },
                StatusCode::CONFLICT,
            ),
            (DomainError::CartEmpty, StatusCode::BAD_REQUEST),
            (DomainError::PublishFailed("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error.clone()).status(), status, "{:?}", error);
        }
    }

    #[test]
    fn test_transport_codes() {
        assert_eq!(ApiError::Unauthorized("x".into()).code(), "UNAUTHORIZED");
        assert_eq!(ApiError::Forbidden("x".into()).code(), "FORBIDDEN");
        assert_eq!(ApiError::BadRequest("x".into()).code(), "BAD_REQUEST");
        assert_eq!(ApiError::from(DomainError::not_owner()).code(), "UNAUTHORIZED");
    }
}
