//! Advisory models.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::listing::{Listable, Patchable};
use crate::types::{flexible_string, lenient_string, RecordId};
use crate::validation::validate_not_blank;

/// The fixed advisory type catalogue accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Cultivation,
    PlantProtection,
    CulturalOperation,
    General,
}

impl AdvisoryCategory {
    pub const ALL: [AdvisoryCategory; 4] = [
        AdvisoryCategory::Cultivation,
        AdvisoryCategory::PlantProtection,
        AdvisoryCategory::CulturalOperation,
        AdvisoryCategory::General,
    ];

    /// Backend identifier, as sent in the `advisory_type` form field.
    pub fn id(self) -> u8 {
        match self {
            AdvisoryCategory::Cultivation => 1,
            AdvisoryCategory::PlantProtection => 2,
            AdvisoryCategory::CulturalOperation => 3,
            AdvisoryCategory::General => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdvisoryCategory::Cultivation => "Cultivation",
            AdvisoryCategory::PlantProtection => "Plant Protection",
            AdvisoryCategory::CulturalOperation => "Cultural Operation",
            AdvisoryCategory::General => "General",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id: u8 = id.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// A row from `GET /getAdvisory`. Media fields are URLs of attached files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: RecordId,
    #[serde(default, deserialize_with = "flexible_string")]
    pub advisory_type: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub document: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio: Option<String>,
}

impl Advisory {
    pub fn category(&self) -> Option<AdvisoryCategory> {
        AdvisoryCategory::from_id(&self.advisory_type)
    }
}

impl Listable for Advisory {
    type Key = RecordId;
    const ENTITY: &'static str = "Advisory";

    fn key(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_str()),
        ]
    }
}

/// DTO for `POST /addAdvisory` and `POST /updateAdvisory`.
///
/// Media files travel as attachments next to these text fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvisoryDraft {
    #[validate(custom(function = "validate_advisory_type"))]
    pub advisory_type: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
}

impl AdvisoryDraft {
    /// Local row for an advisory the backend created without echoing it.
    pub fn into_advisory(self, id: RecordId) -> Advisory {
        Advisory {
            id,
            advisory_type: self.advisory_type,
            title: self.title,
            description: self.description,
            document: None,
            image: None,
            video: None,
            audio: None,
        }
    }
}

impl Patchable for Advisory {
    type Patch = AdvisoryDraft;

    fn apply_patch(&mut self, patch: &AdvisoryDraft) {
        self.advisory_type = patch.advisory_type.clone();
        self.title = patch.title.clone();
        self.description = patch.description.clone();
    }
}

fn validate_advisory_type(value: &str) -> Result<(), ValidationError> {
    if AdvisoryCategory::from_id(value).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("advisory_type");
    error.message = Some(Cow::Borrowed("Type is required"));
    Err(error)
}
