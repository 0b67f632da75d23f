use axum::extract::{Multipart, Path, State};

use rubberwatch_client::collections::{enquiries, Enquiries};
use rubberwatch_core::models::ReplyDraft;
use rubberwatch_core::types::RecordId;

use super::form::FormData;
use super::pages::{page, respond, PageResponse};
use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::state::AppState;

/// POST /api/v1/enquiries/{id}/reply
///
/// Multipart: `query_answer` text plus optional answer files.
pub async fn reply(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<PageResponse<Enquiries>> {
    let form = FormData::read(multipart).await?;
    enquiries::check_media(&form.files)?;
    let draft = ReplyDraft {
        query_answer: form.text("query_answer"),
    };
    let snapshot = page::<Enquiries>(&state)
        .update(RecordId::from_path(&id), draft, form.files)
        .await?;
    Ok(respond::<Enquiries>(snapshot))
}
