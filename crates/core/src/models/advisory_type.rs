//! Advisory type lookup models. Types can be added and deleted, never edited.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::Listable;
use crate::types::{flexible_string, RecordId};
use crate::validation::validate_not_blank;

/// A row from `GET /getAdvisoryTypes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryType {
    pub id: RecordId,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

impl Listable for AdvisoryType {
    type Key = RecordId;
    const ENTITY: &'static str = "AdvisoryType";

    fn key(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str())]
    }
}

/// DTO for `POST /addAdvisoryType`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAdvisoryType {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

impl NewAdvisoryType {
    pub fn into_type(self, id: RecordId) -> AdvisoryType {
        AdvisoryType {
            id,
            name: self.name.trim().to_string(),
        }
    }
}
