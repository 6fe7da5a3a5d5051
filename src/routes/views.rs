use askama::Template;
use axum::{Json, Router, http::StatusCode, response::Html, routing::get};
use chrono::Local;
use serde_json::{Value, json};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    now: String,
    project_name: String,
    version: &'static str,
}

type HtmlError = (StatusCode, Html<String>);

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> Result<Html<String>, HtmlError> {
    let rendered = IndexTemplate {
        now: Local::now().to_rfc3339(),
        project_name: project_name(),
        version: env!("CARGO_PKG_VERSION"),
    }
    .render()
    .map_err(|_| html_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to render index"))?;
    Ok(Html(rendered))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn project_name() -> String {
    let raw = env!("CARGO_PKG_NAME");
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Project".to_string(),
    }
}

fn html_error(status: StatusCode, message: &'static str) -> HtmlError {
    (status, Html(message.to_string()))
}
