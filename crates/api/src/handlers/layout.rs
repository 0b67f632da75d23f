//! Route resolution, the page shell and the theme toggle.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use rubberwatch_core::navigation::{self, Resolution, Shell};
use rubberwatch_core::theme::{Palette, ThemeMode};

use crate::error::AppResult;
use crate::middleware::auth::{authenticate, RequireSession};
use crate::query::PathParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/routes/resolve?path=
///
/// Open to everyone: an unauthenticated caller gets the login redirect.
pub async fn resolve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PathParams>,
) -> Json<DataResponse<Resolution>> {
    let authenticated = authenticate(&headers, &state).is_ok();
    Json(DataResponse::new(navigation::resolve(&params.path, authenticated)))
}

/// GET /api/v1/layout?path=
pub async fn shell(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> Json<DataResponse<Shell>> {
    let shell = Shell::build(&params.path, &session.name, state.session.theme());
    Json(DataResponse::new(shell))
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemeRequest {
    pub mode: Option<ThemeMode>,
}

#[derive(Debug, Serialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub palette: Palette,
}

/// PUT /api/v1/layout/theme
///
/// Set the given mode, or flip the current one when none is given. The
/// choice is kept across sign-outs.
pub async fn set_theme(
    State(state): State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> AppResult<Json<DataResponse<ThemeState>>> {
    let mode = match request.mode {
        Some(mode) => state.session.set_theme(mode).await?,
        None => state.session.toggle_theme().await?,
    };
    tracing::debug!(%mode, "Theme changed");
    Ok(Json(DataResponse::new(ThemeState {
        mode,
        palette: mode.palette(),
    })))
}
