use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use huddle_realtime::{Publisher, TokenIssuer, capability};
use huddle_store::Store;
use huddle_types::api::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest};
use huddle_types::models::Identity;

use crate::error::ApiError;
use crate::tokens::{TokenError, TokenKeys, TokenKind};

pub const ACCESS_COOKIE: &str = "jwt";
pub const REFRESH_COOKIE: &str = "jwt-refresh";
/// The refresh cookie only travels to the refresh endpoint.
pub const REFRESH_COOKIE_PATH: &str = "/api/auth/refresh";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    pub keys: TokenKeys,
    pub publisher: Arc<dyn Publisher>,
    pub issuer: Arc<dyn TokenIssuer>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest);
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?
        .to_string();

    // The store decides uniqueness inside its own critical section.
    if state
        .store
        .create_user(&req.username, &password_hash)?
        .is_none()
    {
        return Err(ApiError::Conflict);
    }

    Ok(StatusCode::OK)
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .user_by_username(&req.username)?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow!("stored password hash unreadable: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let identity = user.identity();
    let token = state.keys.issue(&identity, TokenKind::Access)?;
    let refresh_token = state.keys.issue(&identity, TokenKind::Refresh)?;

    let jar = jar
        .add(access_cookie(token.clone()))
        .add(refresh_cookie(refresh_token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            user: identity,
            token,
            refresh_token,
        }),
    ))
}

/// Mint a new access token from the refresh cookie. Deliberately outside
/// the session middleware: this endpoint is reached precisely when the
/// access token is gone or expired. The refresh token itself is not
/// rotated; it stays valid until its own expiry.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<axum::response::Response, ApiError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::Unauthenticated)?;

    match state.keys.verify(&refresh_token, TokenKind::Refresh) {
        Ok(claims) => {
            let token = state.keys.issue(&claims.user, TokenKind::Access)?;
            let jar = jar.add(access_cookie(token.clone()));
            Ok((jar, Json(RefreshResponse { token })).into_response())
        }
        // Refresh expired: force logout so the client clears local state.
        Err(TokenError::Expired) => {
            let jar = jar
                .remove(access_cookie(String::new()))
                .remove(refresh_cookie(String::new()));
            Ok((jar, ApiError::RefreshExpired.into_response()).into_response())
        }
        Err(TokenError::Invalid) => Err(ApiError::BadRequest),
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(access_cookie(String::new()))
        .remove(refresh_cookie(String::new()));

    (jar, StatusCode::OK)
}

/// Realtime capability token request for the authenticated user, derived
/// fresh from current team membership on every call.
pub async fn socket_token(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let teams = state.store.teams_for(identity.id)?;
    let capability = capability::derive(identity.id, &teams);

    let token_req = state
        .issuer
        .create_token_request(&identity.id.to_string(), &capability)?;

    Ok(Json(token_req))
}

fn access_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(ACCESS_COOKIE, value);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie
}

fn refresh_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, value);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_http_only(true);
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie
}
