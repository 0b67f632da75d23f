//! Program statistics from `GET /bredcrumb` and `GET /getImmobileData`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{flexible_string, lenient_f64, lenient_i64};

/// One entry of the intercrop histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntercropCount {
    #[serde(default, deserialize_with = "flexible_string")]
    pub inter_crops: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub count: i64,
}

/// Workforce and plantation aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_male_workers: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_female_workers: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_immature_area: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_mature_area: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_agri_area: f64,
    /// Tree counts per age range, in the order the backend lists the ranges.
    #[serde(default, deserialize_with = "distribution")]
    pub mature_tree_distribution: IndexMap<String, f64>,
    #[serde(default, deserialize_with = "distribution")]
    pub immature_tree_distribution: IndexMap<String, f64>,
    #[serde(default)]
    pub plotwise_unique_intercrops: Vec<IntercropCount>,
}

/// Program outreach counters maintained by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImmobileData {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub no_of_lead_farmers: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub producer_society: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub entrepreneur_strengthened: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub demo_plots: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_farmers_outreached: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub no_of_farmers_trained: i64,
}

/// Raw text of the "update stats" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsForm {
    #[serde(default)]
    pub lead_farmers: String,
    #[serde(default)]
    pub producer_society: String,
    #[serde(default)]
    pub entrepreneur: String,
    #[serde(default)]
    pub demo_plots: String,
    #[serde(default)]
    pub farmers_outreached: String,
    #[serde(default)]
    pub farmers_trained: String,
}

/// DTO for `POST /updateImmobile`.
pub type StatsUpdate = ImmobileData;

impl StatsForm {
    /// Parse every counter. Blank or unparsable inputs become 0; negative
    /// counts are rejected.
    pub fn parse(&self) -> Result<StatsUpdate, CoreError> {
        Ok(StatsUpdate {
            no_of_lead_farmers: counter("leadFarmers", &self.lead_farmers)?,
            producer_society: counter("producerSociety", &self.producer_society)?,
            entrepreneur_strengthened: counter("entrepreneur", &self.entrepreneur)?,
            demo_plots: counter("demoPlots", &self.demo_plots)?,
            total_farmers_outreached: counter("farmersOutreached", &self.farmers_outreached)?,
            no_of_farmers_trained: counter("farmersTrained", &self.farmers_trained)?,
        })
    }
}

fn counter(field: &str, raw: &str) -> Result<i64, CoreError> {
    let value = leading_integer(raw.trim()).unwrap_or(0);
    if value < 0 {
        return Err(CoreError::field(field, "Value cannot be negative"));
    }
    Ok(value)
}

/// Integer prefix of `s` (`"12 plots"` parses as 12).
fn leading_integer(s: &str) -> Option<i64> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

fn distribution<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Count(#[serde(deserialize_with = "lenient_f64")] f64);

    let raw: Option<IndexMap<String, Count>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, Count(v))| (k, v))
        .collect())
}
