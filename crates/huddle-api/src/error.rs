use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. `TokenExpired` and `RefreshExpired` carry
/// sentinel bodies the client interceptor keys on to drive transparent
/// session renewal; everything else is a terse status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no credential presented")]
    Unauthenticated,
    #[error("access token expired")]
    TokenExpired,
    #[error("refresh token expired")]
    RefreshExpired,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("missing required role")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("bad request")]
    BadRequest,
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "TokenExpired").into_response(),
            Self::RefreshExpired => {
                (StatusCode::UNAUTHORIZED, "RefreshTokenExpired").into_response()
            }
            Self::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid username or password").into_response()
            }
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest => StatusCode::BAD_REQUEST.into_response(),
            Self::Conflict => StatusCode::CONFLICT.into_response(),
            Self::Internal(e) => {
                error!("internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
