use uuid::Uuid;

use crate::{
    db::{
        dao::{EventLogDao, NewEventLog},
        entities::event_log,
    },
    error::AppError,
};

#[derive(Clone)]
pub struct EventLogService {
    event_log_dao: EventLogDao,
}

impl EventLogService {
    pub fn new(event_log_dao: EventLogDao) -> Self {
        Self { event_log_dao }
    }

    /// Oldest first. An empty history is reported as not found.
    pub async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<event_log::Model>, AppError> {
        let logs = self.event_log_dao.list_for_user(user_id).await?;
        if logs.is_empty() {
            return Err(AppError::not_found("No event logs found for user ID"));
        }
        Ok(logs)
    }

    pub async fn record(&self, entry: NewEventLog) -> Result<event_log::Model, AppError> {
        let stored = self.event_log_dao.record(entry).await?;
        tracing::info!(
            user_id = %stored.user_id,
            event_log_id = %stored.id,
            event = %stored.event,
            "prediction stored"
        );
        Ok(stored)
    }
}
