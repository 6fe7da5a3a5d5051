use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser, error::AppError, routes::JsonBody, services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PredictRequest {
    pub input: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub result: String,
    pub summary: String,
    pub title: String,
    pub people: Option<String>,
    pub organizations: Option<String>,
    pub locations: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .with_state(state)
}

async fn predict(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    JsonBody(body): JsonBody<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let user_id = caller.ensure_subject(
        body.user_id.as_deref(),
        "Cannot run predictions for another user",
    )?;
    let input = body.input.unwrap_or_default();

    let prediction = ServiceContext::from_state(state.as_ref())
        .prediction(&state.inference)
        .predict(&user_id, &input)
        .await?;

    let entities = prediction.entities.as_ref();
    Ok(Json(PredictResponse {
        people: entities.map(|found| found.people_joined()),
        organizations: entities.map(|found| found.organizations_joined()),
        locations: entities.map(|found| found.locations_joined()),
        result: prediction.category,
        summary: prediction.summary,
        title: prediction.title,
    }))
}
