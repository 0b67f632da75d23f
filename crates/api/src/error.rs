use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use rubberwatch_client::api::ApiError;
use rubberwatch_client::error::ClientError;
use rubberwatch_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ClientError`] for everything
/// that went through the upstream client. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `rubberwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the upstream client or a page controller.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Client(ClientError::Api(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String, Option<BTreeMap<String, String>>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            AppError::Core(core) => classify_core(core),
            AppError::Client(client) => classify_client(client),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(fields) = fields {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core(core: &CoreError) -> Classified {
    match core {
        CoreError::NotFound { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} {key} not found"),
            None,
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            msg.clone(),
            None,
        ),
        CoreError::InvalidFields(fields) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Please correct the highlighted fields".to_string(),
            Some(fields.clone()),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
        CoreError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Upstream failures are reported as gateway errors, except an explicit
/// `success: false`, which is the upstream refusing the operation.
fn classify_client(client: &ClientError) -> Classified {
    match client {
        ClientError::Core(core) => classify_core(core),
        ClientError::Api(ApiError::Request(e)) => {
            tracing::warn!(error = %e, "Upstream unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "The upstream service could not be reached".to_string(),
                None,
            )
        }
        ClientError::Api(ApiError::Status { status, .. }) => (
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_ERROR",
            format!("The upstream service answered with status {status}"),
            None,
        ),
        ClientError::Api(ApiError::Encoding(msg)) => (
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_ERROR",
            msg.clone(),
            None,
        ),
        ClientError::Api(ApiError::Rejected(msg)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "UPSTREAM_REJECTED",
            msg.clone(),
            None,
        ),
        ClientError::Stale(page) => (
            StatusCode::CONFLICT,
            "PAGE_UNMOUNTED",
            format!("The {page} page changed before the response arrived"),
            None,
        ),
        ClientError::NotMounted(page) => (
            StatusCode::CONFLICT,
            "PAGE_NOT_MOUNTED",
            format!("The {page} page is not open"),
            None,
        ),
        ClientError::Io(e) => {
            tracing::error!(error = %e, "I/O error");
            internal()
        }
        ClientError::Json(e) => {
            tracing::error!(error = %e, "JSON error");
            internal()
        }
    }
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
