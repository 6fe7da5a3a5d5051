use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::jwt::JwtKeys, config::AppConfig, inference::Inference};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub inference: Inference,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, inference: Inference) -> Arc<Self> {
        let jwt = JwtKeys::from_secret(config.auth.jwt_secret.as_bytes());
        Arc::new(Self {
            config,
            db,
            jwt,
            inference,
        })
    }
}
