//! Shared helpers for API integration tests.
//!
//! Every test app talks to a [`MockUpstream`] standing in for the backend,
//! the price feed and the quality service.

#![allow(dead_code)]

#[path = "../../../client/tests/common/upstream.rs"]
pub mod upstream;

use std::path::PathBuf;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use rubberwatch_api::config::ServerConfig;
use rubberwatch_api::router::build_app_router;
use rubberwatch_api::state::AppState;
use rubberwatch_client::session::SessionContext;
use rubberwatch_core::session::StoredState;

pub use upstream::{MockUpstream, ADMIN_PASSWORD, ADMIN_PHONE, ADMIN_TOKEN};

/// Build a test `ServerConfig` pointed at `mock`.
pub fn test_config(mock: &MockUpstream) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upstream: mock.urls(),
        upstream_timeout_secs: 5,
        session_file: PathBuf::from("unused-session.json"),
        default_page_size: 5,
        price_excluded_markets: vec![
            "Bangkok".to_string(),
            "Kuala Lumpur".to_string(),
            "Singapore".to_string(),
        ],
    }
}

/// Session state of a signed-in operator.
pub fn signed_in() -> StoredState {
    StoredState {
        token: Some(ADMIN_TOKEN.to_string()),
        name: Some("Admin".to_string()),
        ..Default::default()
    }
}

/// The production router over `session`, with its state for direct checks.
pub fn build_app_with(config: ServerConfig, session: SessionContext) -> (Router, AppState) {
    let state = AppState::new(config.clone(), session).unwrap();
    (build_app_router(state.clone(), &config), state)
}

/// A signed-in app over `mock`.
pub fn build_test_app(mock: &MockUpstream) -> Router {
    build_app_with(test_config(mock), SessionContext::in_memory(signed_in())).0
}

/// A signed-out app over `mock`.
pub fn build_signed_out_app(mock: &MockUpstream) -> Router {
    build_app_with(
        test_config(mock),
        SessionContext::in_memory(StoredState::default()),
    )
    .0
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

/// GET without credentials.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

/// GET with the operator's token.
pub async fn get_auth(app: Router, uri: &str) -> Response {
    send(
        app,
        request(Method::GET, uri, Some(ADMIN_TOKEN))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// POST a JSON body without credentials.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, None, body).await
}

/// POST a JSON body with the operator's token.
pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, Some(ADMIN_TOKEN), body).await
}

/// PUT a JSON body with the operator's token.
pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, Some(ADMIN_TOKEN), body).await
}

/// POST with no body and the operator's token.
pub async fn post_auth(app: Router, uri: &str) -> Response {
    send(
        app,
        request(Method::POST, uri, Some(ADMIN_TOKEN))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// DELETE with the operator's token.
pub async fn delete_auth(app: Router, uri: &str) -> Response {
    send(
        app,
        request(Method::DELETE, uri, Some(ADMIN_TOKEN))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(
        app,
        request(method, uri, token)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "rubberwatch-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a multipart form with the operator's token.
pub async fn multipart_auth(app: Router, method: Method, uri: &str, parts: &[Part<'_>]) -> Response {
    send(
        app,
        request(method, uri, Some(ADMIN_TOKEN))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Read the whole body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
