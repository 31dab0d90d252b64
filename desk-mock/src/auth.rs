//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs carrying the user id, role and the store's token
//! generation at issue time. Bumping the generation
//! ([`MockStore::revoke_sessions`](crate::state::MockStore::revoke_sessions))
//! rejects every previously issued token with 401.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{User, UserRole};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Token lifetime
const EXPIRATION_HOURS: i64 = 24;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: UserRole,
    /// Store token generation at issue time
    pub generation: u64,
    pub exp: i64,
    pub iat: i64,
}

/// Token issue/verify
#[derive(Clone)]
pub struct JwtService {
    secret: String,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn generate_token(&self, user: &User, generation: u64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            generation,
            exp: (now + Duration::hours(EXPIRATION_HOURS)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }

    /// `Bearer <token>` → `<token>`
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
}

/// Rejects requests without a valid, current bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = header.and_then(JwtService::extract_from_header) else {
        tracing::warn!(uri = %req.uri(), "Missing bearer token");
        return Err(AppError::unauthorized());
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(uri = %req.uri(), "Token rejected: {}", e);
        AppError::invalid_token()
    })?;

    let id: i64 = claims.sub.parse().map_err(|_| AppError::invalid_token())?;
    {
        let store = state.store()?;
        if claims.generation != store.token_generation() {
            tracing::warn!(user_id = id, "Revoked token presented");
            return Err(AppError::invalid_token());
        }
        if !store.user(id).is_ok_and(|u| u.active) {
            return Err(AppError::invalid_token());
        }
    }

    req.extensions_mut().insert(CurrentUser {
        id,
        role: claims.role,
    });
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(AppError::unauthorized)
    }
}
