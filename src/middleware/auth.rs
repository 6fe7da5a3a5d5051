use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, jwt::decode_token},
    db::dao::DaoContext,
    error::AppError,
    state::AppState,
};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// Auth guard: valid signature and expiry, subject is a user id, token not revoked.
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>().cloned() {
            return Ok(user);
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?
            .to_string();

        let claims = decode_token(&state.jwt, &token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        let blacklisted = DaoContext::new(&state.db)
            .token_blacklist()
            .is_blacklisted(&token)
            .await?;
        if blacklisted {
            return Err(AppError::unauthorized("Token is blacklisted"));
        }

        let user = AuthUser {
            user_id,
            email: claims.email,
            token,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
