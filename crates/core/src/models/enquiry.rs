//! Farmer enquiry models.
//!
//! The backend returns `admin_reply` as a list; only its first element is
//! ever meaningful, so it is collapsed to a single optional reply here.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::listing::{Listable, Patchable};
use crate::types::{flexible_string, lenient_string, RecordId};
use crate::validation::validate_not_blank;

/// The staff answer to an enquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnquiryReply {
    #[serde(default, deserialize_with = "flexible_string")]
    pub query_answer: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub docs_pdf: Option<String>,
}

/// A row from `GET /getEnquiries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: RecordId,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub query: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio: Option<String>,
    #[serde(default, deserialize_with = "first_reply")]
    pub admin_reply: Option<EnquiryReply>,
}

impl Enquiry {
    pub fn is_answered(&self) -> bool {
        self.admin_reply.is_some()
    }
}

impl Listable for Enquiry {
    type Key = RecordId;
    const ENTITY: &'static str = "Enquiry";

    fn key(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.query.as_str()),
        ];
        if let Some(phone) = &self.phone {
            fields.push(Cow::Borrowed(phone.as_str()));
        }
        fields
    }
}

/// DTO for `POST /replyEnquiry`; the enquiry id and answer files travel
/// alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplyDraft {
    #[validate(custom(function = "validate_not_blank"))]
    pub query_answer: String,
}

impl Patchable for Enquiry {
    type Patch = ReplyDraft;

    fn apply_patch(&mut self, patch: &ReplyDraft) {
        match &mut self.admin_reply {
            Some(reply) => reply.query_answer = patch.query_answer.clone(),
            None => {
                self.admin_reply = Some(EnquiryReply {
                    query_answer: patch.query_answer.clone(),
                    image_answer: None,
                    video_answer: None,
                    audio_answer: None,
                    docs_pdf: None,
                })
            }
        }
    }
}

/// Accept `[reply, ...]`, a bare reply object, `[]` or `null`.
fn first_reply<'de, D>(deserializer: D) -> Result<Option<EnquiryReply>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Many(Vec<EnquiryReply>),
        One(EnquiryReply),
    }

    let shape: Option<Shape> = Option::deserialize(deserializer)?;
    Ok(match shape {
        Some(Shape::Many(replies)) => replies.into_iter().next(),
        Some(Shape::One(reply)) => Some(reply),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_list_collapses_to_first_element() {
        let enquiry: Enquiry = serde_json::from_str(
            r#"{
                "id": 5, "name": "Manik", "phone": "9000000000", "query": "Leaf spots?",
                "admin_reply": [
                    {"query_answer": "Spray copper oxychloride", "image_answer": "https://x/a.jpg"},
                    {"query_answer": "ignored"}
                ]
            }"#,
        )
        .unwrap();
        let reply = enquiry.admin_reply.unwrap();
        assert_eq!(reply.query_answer, "Spray copper oxychloride");
        assert_eq!(reply.image_answer.as_deref(), Some("https://x/a.jpg"));
    }

    #[test]
    fn empty_or_missing_reply_is_unanswered() {
        let empty: Enquiry =
            serde_json::from_str(r#"{"id": 1, "name": "A", "query": "Q", "admin_reply": []}"#)
                .unwrap();
        let missing: Enquiry =
            serde_json::from_str(r#"{"id": 2, "name": "B", "query": "Q"}"#).unwrap();
        assert!(!empty.is_answered());
        assert!(!missing.is_answered());
    }

    #[test]
    fn replying_sets_the_answer() {
        let mut enquiry: Enquiry =
            serde_json::from_str(r#"{"id": 1, "name": "A", "query": "Q"}"#).unwrap();
        enquiry.apply_patch(&ReplyDraft {
            query_answer: "Use mulch".into(),
        });
        assert_eq!(
            enquiry.admin_reply.map(|r| r.query_answer).as_deref(),
            Some("Use mulch")
        );
    }
}
