//! Session-token extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use rubberwatch_core::error::CoreError;
use rubberwatch_core::session::Session;

use crate::error::AppError;
use crate::state::AppState;

/// The signed-in operator, proven by a Bearer token equal to the session's.
///
/// Use this as an extractor parameter in any handler behind the login:
///
/// ```ignore
/// async fn my_handler(RequireSession(session): RequireSession) -> AppResult<Json<()>> {
///     tracing::info!(user = %session.name, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).map(RequireSession)
    }
}

/// Check the `Authorization` header against the current session.
pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Session, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    match state.session.current() {
        Some(session) if session.token == token => Ok(session),
        Some(_) => Err(unauthorized("Invalid or expired session")),
        None => Err(unauthorized("Not signed in")),
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
