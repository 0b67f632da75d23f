//! Field officer models.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::listing::Listable;
use crate::types::{flexible_string, lenient_bool, lenient_string, RecordId};
use crate::validation::{validate_not_blank, validate_phone};

/// Genders accepted by the officer registration form.
pub const OFFICER_GENDERS: &[&str] = &["male", "female"];

/// A row from `GET /getOfficerData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: RecordId,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    /// Whether the officer may sign in to the field app.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub status: bool,
}

impl Listable for Officer {
    type Key = RecordId;
    const ENTITY: &'static str = "Officer";

    fn key(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Owned(self.id.to_string()),
        ];
        if let Some(phone) = &self.phone {
            fields.push(Cow::Borrowed(phone.as_str()));
        }
        fields
    }
}

/// DTO for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOfficer {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub password: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
}

impl NewOfficer {
    /// Local row for an officer the backend registered without echoing it.
    /// New officers start active.
    pub fn into_officer(self, id: RecordId) -> Officer {
        Officer {
            id,
            name: self.name,
            phone: Some(self.phone),
            gender: Some(self.gender),
            status: true,
        }
    }
}

/// DTO for `POST /updateOfficerStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerStatusUpdate {
    pub id: RecordId,
    pub status: bool,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if OFFICER_GENDERS.contains(&gender.to_ascii_lowercase().as_str()) {
        return Ok(());
    }
    let mut error = ValidationError::new("gender");
    error.message = Some(Cow::Borrowed("Gender is required"));
    Err(error)
}
