//! Rubber price feed: query construction, the latest-price board and the
//! market trend series.
//!
//! The trend series pivots raw price points into one row per arrival date and
//! one `{market}_INR` column per market. Excluded markets are dropped before
//! the pivot, so they never contribute a column.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{flexible_string, lenient_f64};

/// Markets dropped from the trend unless configured otherwise.
pub const DEFAULT_EXCLUDED_MARKETS: &[&str] = &["Bangkok", "Kuala Lumpur", "Singapore"];

/// Market choices offered by the filters, as `(id, label)`.
pub const MARKETS: &[(&str, &str)] = &[
    ("all", "All Markets"),
    ("agartala", "Agartala"),
    ("kochi", "Kochi"),
    ("kottayam", "Kottayam"),
];

/// How many days back the latest-price board looks before giving up.
pub const LATEST_FALLBACK_DAYS: u64 = 2;

/// Label shown when no recent date had any prices.
pub const NO_DATA_LABEL: &str = "No data available";

// ---------------------------------------------------------------------------
// Price points
// ---------------------------------------------------------------------------

/// A row from `GET /fetch_rubber_prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "flexible_string")]
    pub market: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub grade: String,
    #[serde(rename = "INR", default, deserialize_with = "lenient_f64")]
    pub inr: f64,
    #[serde(rename = "USD", default, deserialize_with = "lenient_f64")]
    pub usd: f64,
    #[serde(default, deserialize_with = "arrival_date")]
    pub arrival_date: Option<NaiveDate>,
}

/// Accept `YYYY-MM-DD` optionally followed by a time part.
fn arrival_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = crate::types::lenient_string(deserializer)?;
    Ok(raw.and_then(|s| {
        let day = s.get(..10).unwrap_or(&s);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }))
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceGrade {
    #[default]
    #[serde(rename = "RSS4")]
    Rss4,
    #[serde(rename = "RSS5")]
    Rss5,
    #[serde(rename = "Latex60%")]
    Latex60,
    #[serde(rename = "ISNR20")]
    Isnr20,
}

impl PriceGrade {
    pub const ALL: [PriceGrade; 4] = [
        PriceGrade::Rss4,
        PriceGrade::Rss5,
        PriceGrade::Latex60,
        PriceGrade::Isnr20,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PriceGrade::Rss4 => "RSS4",
            PriceGrade::Rss5 => "RSS5",
            PriceGrade::Latex60 => "Latex60%",
            PriceGrade::Isnr20 => "ISNR20",
        }
    }
}

impl fmt::Display for PriceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceGrade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::field("grade", format!("Unknown grade '{s}'")))
    }
}

/// Market filter: every market, or one market id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarketFilter {
    #[default]
    All,
    Market(String),
}

impl MarketFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => MarketFilter::All,
            Some(m) if m.eq_ignore_ascii_case("all") => MarketFilter::All,
            Some(m) => MarketFilter::Market(m.to_lowercase()),
        }
    }

    pub fn matches(&self, market: &str) -> bool {
        match self {
            MarketFilter::All => true,
            MarketFilter::Market(id) => market.to_lowercase() == *id,
        }
    }
}

/// Parameters of a price trend request.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub grade: PriceGrade,
    pub market: MarketFilter,
}

impl PriceQuery {
    /// Default filters: grade RSS4, every market, two months back to `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            from_date: today.checked_sub_months(Months::new(2)).unwrap_or(today),
            to_date: today,
            grade: PriceGrade::default(),
            market: MarketFilter::All,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.from_date > self.to_date {
            return Err(CoreError::field(
                "from_date",
                "From date must not be after to date",
            ));
        }
        Ok(())
    }

    /// Query-string pairs. `market` is omitted for all markets.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from_date", self.from_date.format("%Y-%m-%d").to_string()),
            ("to_date", self.to_date.format("%Y-%m-%d").to_string()),
            ("grade", self.grade.to_string()),
        ];
        if let MarketFilter::Market(market) = &self.market {
            params.push(("market", market.clone()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Latest price board
// ---------------------------------------------------------------------------

/// Dates the latest board tries, newest first.
pub fn fallback_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..=LATEST_FALLBACK_DAYS)
        .filter_map(|days| today.checked_sub_days(chrono::Days::new(days)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradePrice {
    pub grade: String,
    pub inr: f64,
    pub usd: f64,
}

/// All grades quoted for one market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBoard {
    pub market: String,
    pub prices: Vec<GradePrice>,
}

/// Group price points per market (ignoring case), in first-appearance order.
pub fn group_by_market(points: &[PricePoint]) -> Vec<MarketBoard> {
    let mut boards: IndexMap<String, MarketBoard> = IndexMap::new();
    for point in points {
        boards
            .entry(point.market.to_lowercase())
            .or_insert_with(|| MarketBoard {
                market: point.market.clone(),
                prices: Vec::new(),
            })
            .prices
            .push(GradePrice {
                grade: point.grade.clone(),
                inr: point.inr,
                usd: point.usd,
            });
    }
    boards.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestBoard {
    /// Date whose prices are shown, or [`NO_DATA_LABEL`].
    pub date_label: String,
    pub date: Option<NaiveDate>,
    pub markets: Vec<MarketBoard>,
}

impl LatestBoard {
    pub fn empty() -> Self {
        Self {
            date_label: NO_DATA_LABEL.to_string(),
            date: None,
            markets: Vec::new(),
        }
    }

    pub fn from_points(date: NaiveDate, points: &[PricePoint]) -> Self {
        Self {
            date_label: date.format("%Y-%m-%d").to_string(),
            date: Some(date),
            markets: group_by_market(points),
        }
    }

    /// Keep only the markets matching `filter`.
    pub fn filtered(mut self, filter: &MarketFilter) -> Self {
        self.markets.retain(|m| filter.matches(&m.market));
        self
    }
}

// ---------------------------------------------------------------------------
// Trend series
// ---------------------------------------------------------------------------

/// Which way missing cells are filled from their neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillDirection {
    /// Carry the last earlier value forward.
    #[default]
    Forward,
    /// Carry the next later value backward.
    Backward,
    None,
}

/// One row of the pivoted series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: IndexMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    /// Column names (`{market}_INR`), in first-appearance order.
    pub columns: Vec<String>,
    /// Rows ascending by date.
    pub rows: Vec<TrendRow>,
}

pub fn column_name(market: &str) -> String {
    format!("{market}_INR")
}

fn is_excluded(market: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|e| e.eq_ignore_ascii_case(market.trim()))
}

/// Pivot `points` into a date-by-market series of INR prices.
///
/// Points without an arrival date are skipped. Markets are matched ignoring
/// case and the column takes the first spelling seen. When a market has two
/// points on one date the later one wins.
pub fn build_trend(points: &[PricePoint], excluded: &[String], fill: FillDirection) -> PriceSeries {
    let mut markets: IndexMap<String, String> = IndexMap::new();
    let mut by_date: BTreeMap<NaiveDate, IndexMap<String, f64>> = BTreeMap::new();

    for point in points.iter().filter(|p| !is_excluded(&p.market, excluded)) {
        let Some(date) = point.arrival_date else {
            continue;
        };
        let market = point.market.trim();
        let column = markets
            .entry(market.to_lowercase())
            .or_insert_with(|| column_name(market))
            .clone();
        by_date.entry(date).or_default().insert(column, point.inr);
    }
    let columns: Vec<String> = markets.into_values().collect();

    let mut rows: Vec<TrendRow> = by_date
        .into_iter()
        .map(|(date, prices)| TrendRow {
            date,
            values: columns
                .iter()
                .map(|c| (c.clone(), prices.get(c).copied()))
                .collect(),
        })
        .collect();

    fill_gaps(&mut rows, &columns, fill);
    PriceSeries { columns, rows }
}

/// Fill missing cells of each column in the given direction.
pub fn fill_gaps(rows: &mut [TrendRow], columns: &[String], fill: FillDirection) {
    for column in columns {
        let mut carried: Option<f64> = None;
        let mut visit = |row: &mut TrendRow| {
            let Some(cell) = row.values.get_mut(column) else {
                return;
            };
            match *cell {
                Some(v) => carried = Some(v),
                None => *cell = carried,
            }
        };
        match fill {
            FillDirection::Forward => rows.iter_mut().for_each(&mut visit),
            FillDirection::Backward => rows.iter_mut().rev().for_each(&mut visit),
            FillDirection::None => {}
        }
    }
}

/// Keep only the market columns whose market name contains `term`,
/// ignoring case. An empty term keeps every column.
pub fn search_markets(series: &PriceSeries, term: &str) -> PriceSeries {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return series.clone();
    }
    let columns: Vec<String> = series
        .columns
        .iter()
        .filter(|c| {
            c.strip_suffix("_INR")
                .unwrap_or(c)
                .to_lowercase()
                .contains(&needle)
        })
        .cloned()
        .collect();
    let rows = series
        .rows
        .iter()
        .map(|row| TrendRow {
            date: row.date,
            values: row
                .values
                .iter()
                .filter(|(k, _)| columns.contains(k))
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        })
        .collect();
    PriceSeries { columns, rows }
}
