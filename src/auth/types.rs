use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,   // user id
    pub email: String, // login identity
    pub exp: usize,    // expiry (unix)
    pub iat: usize,    // issued at
}

/// Caller identity resolved by the auth guard: a valid, non-revoked bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl AuthUser {
    /// Resolves an optional client-supplied `user_id` to the caller's own id.
    /// Callers may only act on their own records; any other id is refused with `denied`.
    pub fn ensure_subject(&self, requested: Option<&str>, denied: &str) -> Result<Uuid, AppError> {
        let Some(raw) = requested.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(self.user_id);
        };
        let requested =
            Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid user_id"))?;
        if requested != self.user_id {
            return Err(AppError::forbidden(denied));
        }
        Ok(requested)
    }
}
