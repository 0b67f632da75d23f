//! Farmer summary models.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::{Listable, Patchable};
use crate::types::{flexible_string, lenient_string};
use crate::validation::validate_not_blank;

/// A row from `GET /farmer_summary`.
///
/// Numeric columns are kept as the text the backend sent; they are only ever
/// displayed and echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    #[serde(deserialize_with = "flexible_string")]
    pub grower_id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_agri_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rubber_area_mature: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rubber_area_immature: Option<String>,
    #[serde(
        default,
        rename = "harvestingTree",
        alias = "harvesting_tree",
        deserialize_with = "lenient_string"
    )]
    pub harvesting_tree: Option<String>,
    #[serde(
        default,
        rename = "harvestingTrade",
        alias = "harvesting_trade",
        deserialize_with = "lenient_string"
    )]
    pub harvesting_trade: Option<String>,
    #[serde(default, rename = "farmType", deserialize_with = "lenient_string")]
    pub farm_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: Option<String>,
    #[serde(default, rename = "yield", deserialize_with = "lenient_string")]
    pub yield_: Option<String>,
}

impl Listable for Farmer {
    type Key = String;
    const ENTITY: &'static str = "Farmer";

    fn key(&self) -> &String {
        &self.grower_id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.grower_id.as_str()),
        ]
    }
}

/// DTO for `POST /update_farmer_summary`. The grower id travels separately.
///
/// Absent fields are left unchanged on the local row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FarmerPatch {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_agri_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubber_area_mature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubber_area_immature: Option<String>,
    #[serde(
        default,
        rename = "harvestingTree",
        alias = "harvesting_tree",
        skip_serializing_if = "Option::is_none"
    )]
    pub harvesting_tree: Option<String>,
    #[serde(
        default,
        rename = "harvestingTrade",
        alias = "harvesting_trade",
        skip_serializing_if = "Option::is_none"
    )]
    pub harvesting_trade: Option<String>,
    #[serde(
        default,
        rename = "farmType",
        alias = "farm_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub farm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yield_: Option<String>,
}

impl Patchable for Farmer {
    type Patch = FarmerPatch;

    fn apply_patch(&mut self, patch: &FarmerPatch) {
        fn merge(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        self.name = patch.name.clone();
        merge(&mut self.gender, &patch.gender);
        merge(&mut self.address, &patch.address);
        merge(&mut self.total_agri_area, &patch.total_agri_area);
        merge(&mut self.rubber_area_mature, &patch.rubber_area_mature);
        merge(&mut self.rubber_area_immature, &patch.rubber_area_immature);
        merge(&mut self.harvesting_tree, &patch.harvesting_tree);
        merge(&mut self.harvesting_trade, &patch.harvesting_trade);
        merge(&mut self.farm_type, &patch.farm_type);
        merge(&mut self.latitude, &patch.latitude);
        merge(&mut self.longitude, &patch.longitude);
        merge(&mut self.yield_, &patch.yield_);
    }
}
