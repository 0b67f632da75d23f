//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

use rubberwatch_core::prices::FillDirection;

/// View parameters of a list page (`?search=&page=&page_size=`).
///
/// Absent parameters leave the current view unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ViewParams {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.page.is_none() && self.page_size.is_none()
    }
}

/// Second step of a two-step delete (`?confirm=true`).
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

/// A browser path (`?path=/Farmers`).
#[derive(Debug, Default, Deserialize)]
pub struct PathParams {
    #[serde(default)]
    pub path: String,
}

/// Latest price board filter (`?market=`).
#[derive(Debug, Default, Deserialize)]
pub struct MarketParams {
    pub market: Option<String>,
}

/// Price trend filters. Missing dates default to the last two months.
#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub market: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub fill: FillDirection,
}
