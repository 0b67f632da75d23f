//! Advisories: list, create and update (with optional media), delete.

use async_trait::async_trait;
use serde::Serialize;

use rubberwatch_core::attachments::{Attachments, ADVISORY_ATTACHMENT_FIELDS};
use rubberwatch_core::error::CoreError;
use rubberwatch_core::models::{Advisory, AdvisoryDraft};
use rubberwatch_core::types::RecordId;

use super::{RemoteCollection, RemoteCreate, RemoteDelete, RemoteUpdate};
use crate::api::{ApiError, Service, UpstreamApi};

pub struct Advisories;

#[derive(Serialize)]
struct AdvisoryUpdate<'a> {
    id: &'a RecordId,
    #[serde(flatten)]
    draft: &'a AdvisoryDraft,
}

/// Reject media submitted under a field the advisory endpoints do not accept.
pub fn check_media(files: &Attachments) -> Result<(), CoreError> {
    files.ensure_allowed(ADVISORY_ATTACHMENT_FIELDS)
}

#[async_trait]
impl RemoteCollection for Advisories {
    type Item = Advisory;
    const PAGE: &'static str = "advisories";

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<Advisory>, ApiError> {
        api.get_json(Service::Backend, "/getAdvisory", &[]).await
    }
}

#[async_trait]
impl RemoteCreate for Advisories {
    type Draft = AdvisoryDraft;

    async fn create(
        &self,
        api: &UpstreamApi,
        draft: &AdvisoryDraft,
        files: &Attachments,
    ) -> Result<Option<Advisory>, ApiError> {
        let reply = api
            .post_form(Service::Backend, "/addAdvisory", draft, files)
            .await?;
        Ok(UpstreamApi::echoed(reply))
    }

    fn provisional(&self, draft: AdvisoryDraft) -> Advisory {
        draft.into_advisory(RecordId::provisional())
    }
}

#[async_trait]
impl RemoteUpdate for Advisories {
    async fn update(
        &self,
        api: &UpstreamApi,
        key: &RecordId,
        patch: &AdvisoryDraft,
        files: &Attachments,
    ) -> Result<(), ApiError> {
        let body = AdvisoryUpdate {
            id: key,
            draft: patch,
        };
        api.post_form(Service::Backend, "/updateAdvisory", &body, files)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteDelete for Advisories {
    async fn remove(&self, api: &UpstreamApi, key: &RecordId) -> Result<(), ApiError> {
        api.post_json(
            Service::Backend,
            "/deleteAdvisory",
            &serde_json::json!({ "id": key }),
        )
        .await?;
        Ok(())
    }
}
