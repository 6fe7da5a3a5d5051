use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser,
    error::AppError,
    routes::JsonBody,
    services::{ServiceContext, auth_service::Registration},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl RegisterRequest {
    fn into_registration(self) -> Result<Registration, AppError> {
        let missing = || AppError::bad_request("Missing fields");
        Ok(Registration {
            first_name: present(self.first_name).ok_or_else(missing)?,
            last_name: present(self.last_name).ok_or_else(missing)?,
            email: present(self.email).ok_or_else(missing)?,
            password: present(self.password).ok_or_else(missing)?,
            confirm_password: present(self.confirm_password).ok_or_else(missing)?,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let registration = body.into_registration()?;
    let services = ServiceContext::from_state(state.as_ref());
    let session = services
        .auth(&state.jwt, state.config.auth.token_ttl_secs)
        .register(registration)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            token: session.token,
            user_id: session.user.id.to_string(),
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(email), Some(password)) = (present(body.email), present(body.password)) else {
        return Err(AppError::bad_request("Missing fields"));
    };

    let services = ServiceContext::from_state(state.as_ref());
    let session = services
        .auth(&state.jwt, state.config.auth.token_ttl_secs)
        .login(&email, &password)
        .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        first_name: session.user.first_name,
        last_name: session.user.last_name,
        user_id: session.user.id.to_string(),
    }))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(&state.jwt, state.config.auth.token_ttl_secs)
        .logout(&caller)
        .await?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::RegisterRequest;
    use crate::error::AppError;

    fn full() -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Nusrat".to_string()),
            last_name: Some("Jahan".to_string()),
            email: Some("nusrat@example.com".to_string()),
            password: Some("password123".to_string()),
            confirm_password: Some("password123".to_string()),
        }
    }

    #[test]
    fn complete_request_converts() {
        let registration = full().into_registration().expect("should convert");
        assert_eq!(registration.first_name, "Nusrat");
        assert_eq!(registration.email, "nusrat@example.com");
    }

    #[test]
    fn blank_or_missing_fields_are_rejected() {
        let mut blank = full();
        blank.last_name = Some("   ".to_string());
        assert!(matches!(
            blank.into_registration(),
            Err(AppError::BadRequest(ref m)) if m == "Missing fields"
        ));

        let mut missing = full();
        missing.confirm_password = None;
        assert!(missing.into_registration().is_err());
    }
}
