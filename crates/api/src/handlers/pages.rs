//! Handlers shared by every list page: mount, view, unmount, cancel and the
//! two-step delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use rubberwatch_client::collections::{KeyOf, RemoteCollection, RemoteDelete};
use rubberwatch_client::controller::{ListController, SnapshotOf};
use rubberwatch_core::types::RecordId;

use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::query::{ConfirmParams, ViewParams};
use crate::response::DataResponse;
use crate::state::{AppState, PageOf, Pages};

/// `{ "data": snapshot }` for collection `C`.
pub type PageResponse<C> = Json<DataResponse<SnapshotOf<C>>>;

/// A key that can be taken from a URL path segment.
pub trait PathKey: Sized {
    fn from_path(segment: &str) -> Self;
}

impl PathKey for String {
    fn from_path(segment: &str) -> Self {
        segment.to_string()
    }
}

impl PathKey for RecordId {
    fn from_path(segment: &str) -> Self {
        RecordId::from_path(segment)
    }
}

pub(crate) fn page<C>(state: &AppState) -> &ListController<C>
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    PageOf::<C>::page(state.pages.as_ref())
}

pub(crate) fn respond<C: RemoteCollection>(snapshot: SnapshotOf<C>) -> PageResponse<C> {
    Json(DataResponse::new(snapshot))
}

/// POST /api/v1/{page}/mount
///
/// Open the page fresh and load its collection.
pub async fn mount<C>(
    _session: RequireSession,
    State(state): State<AppState>,
) -> AppResult<PageResponse<C>>
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    let snapshot = page::<C>(&state).mount().await?;
    Ok(respond::<C>(snapshot))
}

/// POST /api/v1/{page}/unmount
pub async fn unmount<C>(_session: RequireSession, State(state): State<AppState>) -> StatusCode
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    page::<C>(&state).unmount().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/{page}?search=&page=&page_size=
///
/// Apply any given view parameters and return the current page.
pub async fn view<C>(
    _session: RequireSession,
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<PageResponse<C>>
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    let controller = page::<C>(&state);
    let snapshot = if params.is_empty() {
        controller.snapshot().await?
    } else {
        controller
            .apply_view(params.search.as_deref(), params.page, params.page_size)
            .await?
    };
    Ok(respond::<C>(snapshot))
}

/// POST /api/v1/{page}/cancel
///
/// Close whatever dialog is open.
pub async fn cancel<C>(
    _session: RequireSession,
    State(state): State<AppState>,
) -> AppResult<PageResponse<C>>
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    let snapshot = page::<C>(&state).close_dialog().await?;
    Ok(respond::<C>(snapshot))
}

/// DELETE /api/v1/{page}/{key}?confirm=
///
/// Without `confirm=true` this only asks for confirmation (202). With it,
/// the entity is deleted if its deletion was asked for.
pub async fn remove<C>(
    _session: RequireSession,
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<(StatusCode, PageResponse<C>)>
where
    C: RemoteDelete,
    Pages: PageOf<C>,
    KeyOf<C>: PathKey,
{
    let key = KeyOf::<C>::from_path(&raw_key);
    let controller = page::<C>(&state);
    if params.confirm {
        let snapshot = controller.confirm_remove(key).await?;
        Ok((StatusCode::OK, respond::<C>(snapshot)))
    } else {
        let snapshot = controller.request_remove(key).await?;
        Ok((StatusCode::ACCEPTED, respond::<C>(snapshot)))
    }
}
