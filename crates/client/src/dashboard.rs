//! Overview page loaders: program statistics, latest prices and the price
//! trend.

use chrono::NaiveDate;

use rubberwatch_core::charts::OverviewCharts;
use rubberwatch_core::models::{Breadcrumb, ImmobileData, StatsForm, StatsUpdate};
use rubberwatch_core::prices::{
    build_trend, fallback_dates, search_markets, FillDirection, LatestBoard, MarketFilter,
    PricePoint, PriceQuery, PriceSeries,
};

use crate::api::{Service, UpstreamApi};
use crate::error::ClientError;

const PRICES_PATH: &str = "/fetch_rubber_prices";

/// Fetch both aggregate endpoints concurrently and build the charts.
pub async fn load_overview(api: &UpstreamApi) -> Result<OverviewCharts, ClientError> {
    let (crumb, immobile) = tokio::try_join!(
        api.get_json::<Breadcrumb>(Service::Backend, "/bredcrumb", &[]),
        api.get_json::<ImmobileData>(Service::Backend, "/getImmobileData", &[]),
    )?;
    Ok(OverviewCharts::build(&crumb, &immobile))
}

/// Parse the stats form and send it with `POST /updateImmobile`.
pub async fn update_stats(api: &UpstreamApi, form: &StatsForm) -> Result<StatsUpdate, ClientError> {
    let update = form.parse()?;
    api.post_json(Service::Backend, "/updateImmobile", &update)
        .await?;
    tracing::info!("Program statistics updated");
    Ok(update)
}

/// Prices for the most recent day that has any, looking back from `today`.
///
/// A day that fails or returns nothing falls through to the day before.
pub async fn latest_prices(
    api: &UpstreamApi,
    today: NaiveDate,
    market: &MarketFilter,
) -> LatestBoard {
    for date in fallback_dates(today) {
        let day = date.format("%Y-%m-%d").to_string();
        match api
            .get_json::<Vec<PricePoint>>(Service::Price, PRICES_PATH, &[("date", day.clone())])
            .await
        {
            Ok(points) if !points.is_empty() => {
                tracing::debug!(date = %day, count = points.len(), "Latest prices found");
                return LatestBoard::from_points(date, &points).filtered(market);
            }
            Ok(_) => tracing::debug!(date = %day, "No prices for date"),
            Err(e) => tracing::warn!(date = %day, error = %e, "Price lookup failed"),
        }
    }
    LatestBoard::empty()
}

/// Fetch the price trend for `query` and pivot it into a market series.
pub async fn price_trend(
    api: &UpstreamApi,
    query: &PriceQuery,
    excluded: &[String],
    fill: FillDirection,
    search: Option<&str>,
) -> Result<PriceSeries, ClientError> {
    query.validate()?;
    let points: Vec<PricePoint> = api
        .get_json(Service::Price, PRICES_PATH, &query.query_params())
        .await?;
    let series = build_trend(&points, excluded, fill);
    Ok(match search {
        Some(term) => search_markets(&series, term),
        None => series,
    })
}
