use axum::extract::State;
use axum::Json;

use rubberwatch_client::dashboard;
use rubberwatch_core::charts::OverviewCharts;
use rubberwatch_core::models::{StatsForm, StatsUpdate};

use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn overview(
    _session: RequireSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<OverviewCharts>>> {
    let charts = dashboard::load_overview(&state.api).await?;
    Ok(Json(DataResponse::new(charts)))
}

/// PUT /api/v1/dashboard/stats
pub async fn update_stats(
    _session: RequireSession,
    State(state): State<AppState>,
    Json(form): Json<StatsForm>,
) -> AppResult<Json<DataResponse<StatsUpdate>>> {
    let sent = dashboard::update_stats(&state.api, &form).await?;
    Ok(Json(DataResponse::new(sent)))
}
