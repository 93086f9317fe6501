use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use huddle_types::api::Claims;
use huddle_types::models::Identity;

/// The two token classes. Each has its own secret and lifetime, so a
/// leaked secret compromises one class only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn ttl(self) -> Duration {
        match self {
            Self::Access => Duration::hours(1),
            Self::Refresh => Duration::days(1),
        }
    }
}

/// Verification failure, split so callers can react differently: an expired
/// access token triggers the refresh flow, an expired refresh token forces
/// re-login, and anything invalid is rejected outright.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// Signs and verifies both token kinds. Pure computation over the claims;
/// no token state is kept server-side.
#[derive(Clone)]
pub struct TokenKeys {
    access: String,
    refresh: String,
}

impl TokenKeys {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access: access_secret.into(),
            refresh: refresh_secret.into(),
        }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access.as_bytes(),
            TokenKind::Refresh => self.refresh.as_bytes(),
        }
    }

    pub fn issue(&self, user: &Identity, kind: TokenKind) -> anyhow::Result<String> {
        let claims = Claims {
            user: user.clone(),
            exp: (Utc::now() + kind.ttl()).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )?;

        Ok(token)
    }

    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        // Zero leeway: expiry is exact, tests and clients can rely on it.
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}
