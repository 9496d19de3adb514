//! Request-scoped identity.
//!
//! Sessions are signed by the identity provider; this module only verifies
//! them and turns a request into the id of the user behind it.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "storefront_session";

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

/// HMAC keys shared with the identity provider.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a session for `user_id`. Used by the seed binary and tests.
    pub fn issue(&self, user_id: Uuid, email: Option<&str>, ttl: Duration) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_owned),
            exp: usize::try_from(expiration.timestamp()).unwrap_or(0),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Resolve the user behind a request, or `None` for a missing or invalid session.
    pub fn current_user_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        let token = session_token(headers)?;
        let decoded = match decode::<SessionClaims>(token, &self.decoding, &Validation::default())
        {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::debug!(error = %err, "rejected session token");
                return None;
            }
        };
        Uuid::parse_str(&decoded.claims.sub).ok()
    }
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
}

/// The authenticated user of the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .current_user_id(&parts.headers)
            .map(|user_id| CurrentUser { user_id })
            .ok_or(AppError::Unauthorized)
    }
}
