//! Farmer enquiries: list, reply (with optional media), delete.

use async_trait::async_trait;
use serde::Serialize;

use rubberwatch_core::attachments::{Attachments, REPLY_ATTACHMENT_FIELDS};
use rubberwatch_core::error::CoreError;
use rubberwatch_core::models::{Enquiry, ReplyDraft};
use rubberwatch_core::types::RecordId;

use super::{RemoteCollection, RemoteDelete, RemoteUpdate};
use crate::api::{ApiError, Service, UpstreamApi};

pub struct Enquiries;

#[derive(Serialize)]
struct ReplyForm<'a> {
    enquiry_id: &'a RecordId,
    query_answer: &'a str,
}

/// Reject answer files submitted under an unknown field.
pub fn check_media(files: &Attachments) -> Result<(), CoreError> {
    files.ensure_allowed(REPLY_ATTACHMENT_FIELDS)
}

#[async_trait]
impl RemoteCollection for Enquiries {
    type Item = Enquiry;
    const PAGE: &'static str = "enquiries";

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<Enquiry>, ApiError> {
        api.get_json(Service::Backend, "/getEnquiries", &[]).await
    }
}

/// Replying is the only edit an enquiry supports.
#[async_trait]
impl RemoteUpdate for Enquiries {
    async fn update(
        &self,
        api: &UpstreamApi,
        key: &RecordId,
        patch: &ReplyDraft,
        files: &Attachments,
    ) -> Result<(), ApiError> {
        let form = ReplyForm {
            enquiry_id: key,
            query_answer: &patch.query_answer,
        };
        api.post_form(Service::Backend, "/replyEnquiry", &form, files)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteDelete for Enquiries {
    async fn remove(&self, api: &UpstreamApi, key: &RecordId) -> Result<(), ApiError> {
        api.post_json(
            Service::Backend,
            "/deleteEnquiry",
            &serde_json::json!({ "id": key }),
        )
        .await?;
        Ok(())
    }
}
