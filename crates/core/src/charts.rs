//! Chart-ready series derived from the overview aggregates.
//!
//! Every function here is a pure transform of [`Breadcrumb`] /
//! [`ImmobileData`]; drawing is left to the browser.

use serde::Serialize;

use crate::models::{Breadcrumb, ImmobileData};

/// Intercrop categories, in axis order.
pub const INTERCROP_CATEGORIES: &[&str] = &[
    "No", "Pineapple", "Coffee", "Cocoa", "Banana", "Tubers", "Others",
];

/// Gender categories, in axis order.
pub const GENDER_CATEGORIES: &[&str] = &["Male", "Female"];

/// A single labelled value (pie slice, bar).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Mature vs immature tree counts for one age range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeAgeRow {
    pub range: String,
    pub mature: f64,
    pub immature: f64,
}

/// A headline number on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: String,
    pub value: f64,
}

/// Map `(name, count)` entries onto a fixed category list.
///
/// The result has exactly one entry per category, in category order. Names
/// are matched ignoring case and surrounding whitespace; repeated names are
/// summed and names outside the list are dropped. Missing categories get 0.
pub fn category_distribution<'a, I>(categories: &[&str], entries: I) -> Vec<NamedValue>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut totals = vec![0.0; categories.len()];
    for (name, count) in entries {
        let name = name.trim();
        match categories.iter().position(|c| c.eq_ignore_ascii_case(name)) {
            Some(slot) => totals[slot] += count,
            None => tracing::debug!(category = name, "Dropping count for unknown category"),
        }
    }
    categories
        .iter()
        .zip(totals)
        .map(|(name, value)| NamedValue::new(*name, value))
        .collect()
}

pub fn intercrop_distribution(crumb: &Breadcrumb) -> Vec<NamedValue> {
    category_distribution(
        INTERCROP_CATEGORIES,
        crumb
            .plotwise_unique_intercrops
            .iter()
            .map(|c| (c.inter_crops.as_str(), c.count as f64)),
    )
}

pub fn gender_distribution(crumb: &Breadcrumb) -> Vec<NamedValue> {
    category_distribution(
        GENDER_CATEGORIES,
        [
            ("Male", crumb.total_male_workers as f64),
            ("Female", crumb.total_female_workers as f64),
        ],
    )
}

pub fn agri_area(crumb: &Breadcrumb) -> Vec<NamedValue> {
    vec![
        NamedValue::new("Immature Area", crumb.total_immature_area),
        NamedValue::new("Mature Area", crumb.total_mature_area),
        NamedValue::new("Total Agri Area", crumb.total_agri_area),
    ]
}

/// One row per age range. Ranges follow the mature distribution's order;
/// ranges that only appear in the immature distribution come last.
pub fn tree_age_distribution(crumb: &Breadcrumb) -> Vec<TreeAgeRow> {
    let mature = &crumb.mature_tree_distribution;
    let immature = &crumb.immature_tree_distribution;
    mature
        .keys()
        .chain(immature.keys().filter(|k| !mature.contains_key(*k)))
        .map(|range| TreeAgeRow {
            range: range.clone(),
            mature: mature.get(range).copied().unwrap_or(0.0),
            immature: immature.get(range).copied().unwrap_or(0.0),
        })
        .collect()
}

pub fn lead_farmers(immobile: &ImmobileData) -> Vec<NamedValue> {
    vec![
        NamedValue::new("Lead Farmers", immobile.no_of_lead_farmers as f64),
        NamedValue::new("Producer Societies", immobile.producer_society as f64),
    ]
}

pub fn summary_cards(crumb: &Breadcrumb) -> Vec<SummaryCard> {
    let male = crumb.total_male_workers as f64;
    let female = crumb.total_female_workers as f64;
    [
        ("Total Workers", male + female),
        ("Male Workers", male),
        ("Female Workers", female),
        ("Total Agri Area", crumb.total_agri_area),
    ]
    .into_iter()
    .map(|(title, value)| SummaryCard {
        title: title.to_string(),
        value,
    })
    .collect()
}

/// Everything the overview page draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewCharts {
    pub cards: Vec<SummaryCard>,
    pub gender: Vec<NamedValue>,
    pub agri_area: Vec<NamedValue>,
    pub tree_age: Vec<TreeAgeRow>,
    pub intercrops: Vec<NamedValue>,
    pub lead_farmers: Vec<NamedValue>,
    pub stats: ImmobileData,
}

impl OverviewCharts {
    pub fn build(crumb: &Breadcrumb, immobile: &ImmobileData) -> Self {
        Self {
            cards: summary_cards(crumb),
            gender: gender_distribution(crumb),
            agri_area: agri_area(crumb),
            tree_age: tree_age_distribution(crumb),
            intercrops: intercrop_distribution(crumb),
            lead_farmers: lead_farmers(immobile),
            stats: immobile.clone(),
        }
    }
}
