use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    db::dao::DaoContext,
    inference::Inference,
    services::{
        auth_service::AuthService, event_log_service::EventLogService,
        prediction_service::PredictionService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn auth<'a>(&self, jwt: &'a JwtKeys, token_ttl_secs: u64) -> AuthService<'a> {
        AuthService::new(
            self.daos.user(),
            self.daos.token_blacklist(),
            jwt,
            token_ttl_secs,
        )
    }

    pub fn event_log(&self) -> EventLogService {
        EventLogService::new(self.daos.event_log())
    }

    pub fn prediction<'a>(&self, inference: &'a Inference) -> PredictionService<'a> {
        PredictionService::new(inference, self.event_log())
    }
}
