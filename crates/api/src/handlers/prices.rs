//! Market price board and trend.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};

use rubberwatch_client::dashboard;
use rubberwatch_core::prices::{LatestBoard, MarketFilter, PriceGrade, PriceQuery, PriceSeries};

use crate::error::AppResult;
use crate::middleware::auth::RequireSession;
use crate::query::{MarketParams, TrendParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// GET /api/v1/prices/latest?market=
///
/// Never fails: with no prices in the lookback window the board carries the
/// "no data" label.
pub async fn latest(
    _session: RequireSession,
    State(state): State<AppState>,
    Query(params): Query<MarketParams>,
) -> Json<DataResponse<LatestBoard>> {
    let filter = MarketFilter::parse(params.market.as_deref());
    let board = dashboard::latest_prices(&state.api, today(), &filter).await;
    Json(DataResponse::new(board))
}

/// GET /api/v1/prices/trend?from_date=&to_date=&grade=&market=&search=&fill=
pub async fn trend(
    _session: RequireSession,
    State(state): State<AppState>,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<DataResponse<PriceSeries>>> {
    let query = trend_query(&params, today())?;
    let search = params.search.as_deref().filter(|s| !s.trim().is_empty());
    let series = dashboard::price_trend(
        &state.api,
        &query,
        &state.config.price_excluded_markets,
        params.fill,
        search,
    )
    .await?;
    Ok(Json(DataResponse::new(series)))
}

fn trend_query(params: &TrendParams, today: NaiveDate) -> AppResult<PriceQuery> {
    let defaults = PriceQuery::default_for(today);
    let grade = match params.grade.as_deref().filter(|g| !g.trim().is_empty()) {
        Some(raw) => raw.parse::<PriceGrade>()?,
        None => defaults.grade,
    };
    Ok(PriceQuery {
        from_date: params.from_date.unwrap_or(defaults.from_date),
        to_date: params.to_date.unwrap_or(defaults.to_date),
        grade,
        market: MarketFilter::parse(params.market.as_deref()),
    })
}
