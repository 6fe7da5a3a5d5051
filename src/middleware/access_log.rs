use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{Method, Version},
    middleware::Next,
    response::Response,
};

/// One line per request under the `access` target:
/// `<client ip> - "<METHOD> <path> <version>" <status> -`.
pub async fn access_log(req: Request, next: Next) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let method = req.method().clone();
    // Path only, never the query string.
    let path = req.uri().path().to_string();
    let version = req.version();

    let response = next.run(req).await;

    let line = format_access_line(
        client.as_deref(),
        &method,
        &path,
        version,
        response.status().as_u16(),
    );
    tracing::info!(target: "access", "{line}");
    response
}

fn format_access_line(
    client: Option<&str>,
    method: &Method,
    path: &str,
    version: Version,
    status: u16,
) -> String {
    format!(
        "{} - \"{} {} {:?}\" {} -",
        client.unwrap_or("-"),
        method,
        path,
        version,
        status
    )
}
