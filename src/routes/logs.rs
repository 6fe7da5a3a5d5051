use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    db::entities::event_log,
    error::AppError,
    routes::JsonBody,
    services::ServiceContext,
    state::AppState,
};

const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchLogRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EventLogEntry {
    pub corpus: String,
    pub event: String,
    pub title: String,
    pub summary: String,
    pub people: Option<String>,
    pub orgs: Option<String>,
    pub locations: Option<String>,
    pub created: String,
}

impl From<event_log::Model> for EventLogEntry {
    fn from(model: event_log::Model) -> Self {
        Self {
            corpus: model.corpus,
            event: model.event,
            title: model.title,
            summary: model.summary,
            people: model.people,
            orgs: model.orgs,
            locations: model.locations,
            created: model
                .created
                .with_timezone(&Utc)
                .format(CREATED_FORMAT)
                .to_string(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fetch-log", get(fetch_own_logs).post(fetch_logs))
        .route("/fetchlog", post(fetch_logs))
        .with_state(state)
}

async fn fetch_logs(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    JsonBody(body): JsonBody<FetchLogRequest>,
) -> Result<Json<Vec<EventLogEntry>>, AppError> {
    let user_id = caller.ensure_subject(
        body.user_id.as_deref(),
        "Cannot read another user's event logs",
    )?;
    list_logs(&state, &user_id).await
}

async fn fetch_own_logs(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<Json<Vec<EventLogEntry>>, AppError> {
    list_logs(&state, &caller.user_id).await
}

async fn list_logs(state: &AppState, user_id: &Uuid) -> Result<Json<Vec<EventLogEntry>>, AppError> {
    let logs = ServiceContext::from_state(state)
        .event_log()
        .list_for_user(user_id)
        .await?;
    Ok(Json(logs.into_iter().map(EventLogEntry::from).collect()))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    use super::EventLogEntry;
    use crate::db::entities::event_log;

    #[test]
    fn created_is_utc_with_milliseconds() {
        let dhaka = FixedOffset::east_opt(6 * 3600).expect("offset should be valid");
        let created = dhaka
            .with_ymd_and_hms(2024, 5, 1, 16, 20, 30)
            .single()
            .expect("timestamp should be valid")
            + chrono::Duration::milliseconds(123);

        let entry = EventLogEntry::from(event_log::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            corpus: "corpus".to_string(),
            event: "অর্থনীতি".to_string(),
            title: "title".to_string(),
            summary: "summary".to_string(),
            people: Some(String::new()),
            orgs: None,
            locations: None,
            created,
        });

        assert_eq!(entry.created, "2024-05-01T10:20:30.123+00:00");
        assert_eq!(entry.people.as_deref(), Some(""));
    }
}
