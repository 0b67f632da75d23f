//! Farmer page operations beyond the shared list handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use rubberwatch_client::collections::farmers::{self, EXPORT_FILE_NAME};
use rubberwatch_client::collections::Farmers;
use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::FarmerPatch;

use super::pages::{page, respond, PageResponse};
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// PUT /api/v1/farmers/{grower_id}
pub async fn update(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(grower_id): Path<String>,
    Json(patch): Json<FarmerPatch>,
) -> AppResult<PageResponse<Farmers>> {
    let snapshot = page::<Farmers>(&state)
        .update(grower_id, patch, Attachments::new())
        .await?;
    Ok(respond::<Farmers>(snapshot))
}

/// GET /api/v1/farmers/export
///
/// The spreadsheet exactly as the backend produced it.
pub async fn export(
    _session: RequireSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bytes = farmers::export(&state.api).await?;
    tracing::info!(size = bytes.len(), "Farmer export downloaded");
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
