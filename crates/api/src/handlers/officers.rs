use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use rubberwatch_client::collections::Officers;
use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::NewOfficer;
use rubberwatch_core::types::RecordId;

use super::pages::{page, respond, PageResponse};
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::state::AppState;

/// POST /api/v1/officers
pub async fn register(
    _session: RequireSession,
    State(state): State<AppState>,
    Json(draft): Json<NewOfficer>,
) -> AppResult<(StatusCode, PageResponse<Officers>)> {
    let snapshot = page::<Officers>(&state)
        .create(draft, Attachments::new())
        .await?;
    Ok((StatusCode::CREATED, respond::<Officers>(snapshot)))
}

/// POST /api/v1/officers/{id}/status
///
/// Flip between active and inactive.
pub async fn toggle_status(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<PageResponse<Officers>> {
    let snapshot = page::<Officers>(&state)
        .toggle_status(RecordId::from_path(&id))
        .await?;
    Ok(respond::<Officers>(snapshot))
}
