//! Sign-in and sign-out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use rubberwatch_core::error::CoreError;
use rubberwatch_core::models::LoginRequest;
use rubberwatch_core::session::Session;
use rubberwatch_core::validation;

use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub name: String,
}

/// POST /api/v1/auth/login
///
/// Check the credentials with the backend and start a new session. Every
/// page is closed so nothing from a previous session survives.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResult>>> {
    validation::check(&request)?;

    let response = state.api.login(&request).await?;
    let data = response.into_result().map_err(|message| {
        tracing::info!(phone = %request.phone, "Login refused");
        CoreError::Unauthorized(message)
    })?;

    let session = Session {
        token: data.token,
        name: data.name,
    };
    state.unmount_all().await;
    state.session.sign_in(&session).await?;
    tracing::info!(user = %session.name, "Signed in");

    Ok(Json(DataResponse::new(LoginResult {
        token: session.token,
        name: session.name,
    })))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    state.unmount_all().await;
    state.session.sign_out().await?;
    tracing::info!(user = %session.name, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}
