mod auth;
mod extract;
mod logs;
mod predict;
mod views;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::state::AppState;

pub use extract::JsonBody;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.general.cors_origins);
    Router::new()
        .merge(views::router())
        .merge(auth::router(state.clone()))
        .merge(logs::router(state.clone()))
        .merge(predict::router(state))
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
