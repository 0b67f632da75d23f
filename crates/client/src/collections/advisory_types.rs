//! Advisory type lookup: list, add, delete.

use async_trait::async_trait;

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::{AdvisoryType, NewAdvisoryType};
use rubberwatch_core::types::RecordId;

use super::{RemoteCollection, RemoteCreate, RemoteDelete};
use crate::api::{ApiError, Service, UpstreamApi};

pub struct AdvisoryTypes;

#[async_trait]
impl RemoteCollection for AdvisoryTypes {
    type Item = AdvisoryType;
    const PAGE: &'static str = "advisory-types";

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<AdvisoryType>, ApiError> {
        api.get_json(Service::Backend, "/getAdvisoryTypes", &[]).await
    }
}

#[async_trait]
impl RemoteCreate for AdvisoryTypes {
    type Draft = NewAdvisoryType;

    async fn create(
        &self,
        api: &UpstreamApi,
        draft: &NewAdvisoryType,
        _files: &Attachments,
    ) -> Result<Option<AdvisoryType>, ApiError> {
        let reply = api
            .post_json(Service::Backend, "/addAdvisoryType", draft)
            .await?;
        Ok(UpstreamApi::echoed(reply))
    }

    fn provisional(&self, draft: NewAdvisoryType) -> AdvisoryType {
        draft.into_type(RecordId::provisional())
    }
}

#[async_trait]
impl RemoteDelete for AdvisoryTypes {
    async fn remove(&self, api: &UpstreamApi, key: &RecordId) -> Result<(), ApiError> {
        api.post_json(
            Service::Backend,
            "/deleteAdvisoryType",
            &serde_json::json!({ "id": key }),
        )
        .await?;
        Ok(())
    }
}
