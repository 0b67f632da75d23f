//! Per-farmer rubber sheet quality review.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use rubberwatch_core::attachments::QUALITY_UPLOAD_FIELDS;
use rubberwatch_core::quality::{QualityFilter, QualityView};

use super::form::FormData;
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::response::DataResponse;
use crate::state::AppState;

type ViewResponse = Json<DataResponse<QualityView>>;

fn respond(view: QualityView) -> ViewResponse {
    Json(DataResponse::new(view))
}

/// POST /api/v1/quality/{farmer_id}/mount
pub async fn mount(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
) -> AppResult<ViewResponse> {
    let view = state.pages.quality.mount(&farmer_id).await?;
    Ok(respond(view))
}

/// POST /api/v1/quality/{farmer_id}/unmount
pub async fn unmount(_session: RequireSession, State(state): State<AppState>) -> StatusCode {
    state.pages.quality.unmount().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/quality/{farmer_id}?from=&to=&grade=
pub async fn view(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
    Query(filter): Query<QualityFilter>,
) -> AppResult<ViewResponse> {
    let view = state.pages.quality.view(&farmer_id, &filter).await?;
    Ok(respond(view))
}

/// POST /api/v1/quality/{farmer_id}/samples/{index}/detect?from=&to=&grade=
///
/// A sample that already has a result is not analysed again.
pub async fn detect(
    _session: RequireSession,
    State(state): State<AppState>,
    Path((farmer_id, index)): Path<(String, usize)>,
    Query(filter): Query<QualityFilter>,
) -> AppResult<ViewResponse> {
    let reviewer = &state.pages.quality;
    reviewer.detect(&farmer_id, index).await?;
    let view = reviewer.view(&farmer_id, &filter).await?;
    Ok(respond(view))
}

/// POST /api/v1/quality/{farmer_id}/detect-all?from=&to=&grade=
pub async fn detect_all(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
    Query(filter): Query<QualityFilter>,
) -> AppResult<ViewResponse> {
    let view = state.pages.quality.detect_all(&farmer_id, &filter).await?;
    Ok(respond(view))
}

/// POST /api/v1/quality/{farmer_id}/upload
///
/// Multipart: `rubber_grade` text, `image_file` (required) and an optional
/// `remarks` file.
pub async fn upload(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, ViewResponse)> {
    let form = FormData::read(multipart).await?;
    form.files.ensure_allowed(QUALITY_UPLOAD_FIELDS)?;
    let image = form.files.get("image_file").cloned();
    let remarks = form.files.get("remarks").cloned();
    let view = state
        .pages
        .quality
        .upload(&farmer_id, &form.text("rubber_grade"), image, remarks)
        .await?;
    Ok((StatusCode::CREATED, respond(view)))
}
