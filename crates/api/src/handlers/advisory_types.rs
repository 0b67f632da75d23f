use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use rubberwatch_client::collections::AdvisoryTypes;
use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::NewAdvisoryType;

use super::pages::{page, respond, PageResponse};
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::state::AppState;

/// POST /api/v1/advisory-types
pub async fn create(
    _session: RequireSession,
    State(state): State<AppState>,
    Json(draft): Json<NewAdvisoryType>,
) -> AppResult<(StatusCode, PageResponse<AdvisoryTypes>)> {
    let snapshot = page::<AdvisoryTypes>(&state)
        .create(draft, Attachments::new())
        .await?;
    Ok((StatusCode::CREATED, respond::<AdvisoryTypes>(snapshot)))
}
