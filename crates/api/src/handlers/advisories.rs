//! Advisory create and update. Both take a multipart form: the text fields
//! `advisory_type`, `title` and `description`, plus optional media files.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use rubberwatch_client::collections::{advisories, Advisories};
use rubberwatch_core::models::AdvisoryDraft;
use rubberwatch_core::types::RecordId;

use super::form::FormData;
use super::pages::{page, respond, PageResponse};
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::state::AppState;

fn draft(form: &FormData) -> AdvisoryDraft {
    AdvisoryDraft {
        advisory_type: form.text("advisory_type"),
        title: form.text("title"),
        description: form.text("description"),
    }
}

/// POST /api/v1/advisories
pub async fn create(
    _session: RequireSession,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, PageResponse<Advisories>)> {
    let form = FormData::read(multipart).await?;
    advisories::check_media(&form.files)?;
    let snapshot = page::<Advisories>(&state)
        .create(draft(&form), form.files)
        .await?;
    Ok((StatusCode::CREATED, respond::<Advisories>(snapshot)))
}

/// PUT /api/v1/advisories/{id}
///
/// Media sent here replaces the advisory's media; fields without a file are
/// kept.
pub async fn update(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<PageResponse<Advisories>> {
    let form = FormData::read(multipart).await?;
    advisories::check_media(&form.files)?;
    let snapshot = page::<Advisories>(&state)
        .update(RecordId::from_path(&id), draft(&form), form.files)
        .await?;
    Ok(respond::<Advisories>(snapshot))
}
