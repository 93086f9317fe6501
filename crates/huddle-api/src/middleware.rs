use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::{ACCESS_COOKIE, AppState};
use crate::error::ApiError;
use crate::tokens::{TokenError, TokenKind};

/// Extract and validate the access token: Authorization header first, the
/// access cookie as fallback. On success the identity lands in request
/// extensions.
///
/// Expiry answers with the `TokenExpired` sentinel so the client can run
/// the refresh flow and retry instead of forcing a re-login; a bad token
/// gets a generic 400 with no hint of which check failed.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer
        .or_else(|| jar.get(ACCESS_COOKIE).map(|c| c.value().to_string()))
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state
        .keys
        .verify(&token, TokenKind::Access)
        .map_err(|e| match e {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid => ApiError::BadRequest,
        })?;

    req.extensions_mut().insert(claims.user);
    Ok(next.run(req).await)
}
