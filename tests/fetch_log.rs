use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use ghotona::{
    auth::jwt::{JwtKeys, encode_token, make_access_claims},
    db::entities::{event_log, token_blacklist},
    routes::router,
    test_helpers::{TEST_SECRET, fake_inference, test_state},
};

fn app(db: DatabaseConnection) -> Router {
    router(test_state(db, fake_inference()))
}

fn token_for(user_id: &Uuid) -> String {
    let keys = JwtKeys::from_secret(TEST_SECRET.as_bytes());
    let claims = make_access_claims(user_id, "reader@example.com", 3600);
    encode_token(&keys, &claims).unwrap()
}

fn log_row(user_id: Uuid, event: &str, minute: u32) -> event_log::Model {
    event_log::Model {
        id: Uuid::new_v4(),
        user_id,
        corpus: format!("corpus {minute}"),
        event: event.to_string(),
        title: "শিরোনাম".to_string(),
        summary: "সারাংশ".to_string(),
        people: Some("Rahim".to_string()),
        orgs: Some(String::new()),
        locations: None,
        created: FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 10, minute, 30)
            .unwrap(),
    }
}

fn db_with_logs(rows: Vec<event_log::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<token_blacklist::Model>::new()])
        .append_query_results([rows])
        .into_connection()
}

fn request(method: &str, uri: &str, user_id: &Uuid, payload: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));
    match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn returns_callers_logs_in_order() {
    let user_id = Uuid::new_v4();
    let app = app(db_with_logs(vec![
        log_row(user_id, "দুর্ঘটনা", 20),
        log_row(user_id, "খেলাধুলা", 45),
    ]));

    let payload = json!({"user_id": user_id.to_string()});
    let (status, json) = send(app, request("POST", "/fetch-log", &user_id, Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["event"], "দুর্ঘটনা");
    assert_eq!(entries[0]["created"], "2024-05-01T10:20:30.000+00:00");
    assert_eq!(entries[0]["people"], "Rahim");
    assert_eq!(entries[0]["orgs"], "");
    assert!(entries[0]["locations"].is_null());
    assert_eq!(entries[1]["event"], "খেলাধুলা");
    assert!(entries[0].get("user_id").is_none());
}

#[tokio::test]
async fn legacy_path_and_get_use_token_identity() {
    let user_id = Uuid::new_v4();
    let app_post = app(db_with_logs(vec![log_row(user_id, "অপরাধ", 5)]));
    let (status, json) = send(app_post, request("POST", "/fetchlog", &user_id, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["event"], "অপরাধ");

    let app_get = app(db_with_logs(vec![log_row(user_id, "শিক্ষা", 6)]));
    let (status, json) = send(app_get, request("GET", "/fetch-log", &user_id, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["event"], "শিক্ষা");
}

#[tokio::test]
async fn empty_history_is_not_found() {
    let user_id = Uuid::new_v4();
    let app = app(db_with_logs(Vec::new()));

    let (status, json) = send(app, request("POST", "/fetch-log", &user_id, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No event logs found for user ID");
}

#[tokio::test]
async fn other_users_logs_are_forbidden() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<token_blacklist::Model>::new()])
        .into_connection();

    let payload = json!({"user_id": Uuid::new_v4().to_string()});
    let (status, json) = send(app(db), request("POST", "/fetch-log", &user_id, Some(payload))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Cannot read another user's event logs");
}

#[tokio::test]
async fn malformed_user_id_is_bad_request() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<token_blacklist::Model>::new()])
        .into_connection();

    let payload = json!({"user_id": "65f0c2a1b2c3d4e5f6a7b8c9"});
    let (status, json) = send(app(db), request("POST", "/fetch-log", &user_id, Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid user_id");
}
