//! Tests for `AppError` → HTTP response mapping.
//!
//! Most tests call `IntoResponse` directly on `AppError` values; the last one
//! goes through the router with an unreachable upstream.

mod common;

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use rubberwatch_api::error::AppError;
use rubberwatch_client::api::{ApiError, UpstreamUrls};
use rubberwatch_client::error::ClientError;
use rubberwatch_client::session::SessionContext;
use rubberwatch_core::error::CoreError;

use common::{body_json, build_app_with, get_auth, signed_in, test_config, MockUpstream};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Farmer",
        key: "G042".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Farmer G042 not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("malformed multipart".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "malformed multipart");
}

#[tokio::test]
async fn field_errors_are_listed() {
    let mut fields = BTreeMap::new();
    fields.insert("phone".to_string(), "Enter a valid 10-digit phone number".to_string());
    let err = AppError::Core(CoreError::InvalidFields(fields));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["phone"], "Enter a valid 10-digit phone number");
}

#[tokio::test]
async fn plain_validation_has_no_fields() {
    let err = AppError::Core(CoreError::Validation("Unexpected file field 'x'".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("not requested".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn client_core_errors_map_like_core_errors() {
    let err = AppError::Client(ClientError::Core(CoreError::Unauthorized("no".into())));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn upstream_status_is_bad_gateway() {
    let err = AppError::from(ApiError::Status {
        status: 500,
        body: "boom".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "The upstream service answered with status 500");
}

#[tokio::test]
async fn upstream_rejection_is_422_with_its_message() {
    let err = AppError::from(ApiError::Rejected("Officer already exists".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "UPSTREAM_REJECTED");
    assert_eq!(json["error"], "Officer already exists");
}

#[tokio::test]
async fn stale_and_unmounted_pages_are_409() {
    let (status, json) = error_to_response(AppError::Client(ClientError::Stale("farmers"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "PAGE_UNMOUNTED");

    let (status, json) =
        error_to_response(AppError::Client(ClientError::NotMounted("farmers"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "PAGE_NOT_MOUNTED");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let err = AppError::InternalError("secret stack trace".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn unreachable_upstream_is_502_unavailable() {
    let mock = MockUpstream::start().await;
    let mut config = test_config(&mock);
    // Nothing listens on port 9 (discard) on the test host.
    config.upstream = UpstreamUrls {
        backend: "http://127.0.0.1:9/api".to_string(),
        price: "http://127.0.0.1:9".to_string(),
        quality: "http://127.0.0.1:9".to_string(),
    };
    let (app, _state) = build_app_with(config, SessionContext::in_memory(signed_in()));

    let response = get_auth(app, "/api/v1/dashboard").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_UNAVAILABLE");
}
