//! Farmer summaries: list, update, delete and spreadsheet export.

use async_trait::async_trait;
use serde::Serialize;

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::{Farmer, FarmerPatch};

use super::{RemoteCollection, RemoteDelete, RemoteUpdate};
use crate::api::{ApiError, Service, UpstreamApi};

/// File name offered for the farmer export.
pub const EXPORT_FILE_NAME: &str = "farmers.xlsx";

pub struct Farmers;

#[derive(Serialize)]
struct FarmerUpdate<'a> {
    grower_id: &'a str,
    #[serde(flatten)]
    patch: &'a FarmerPatch,
}

#[async_trait]
impl RemoteCollection for Farmers {
    type Item = Farmer;
    const PAGE: &'static str = "farmers";

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<Farmer>, ApiError> {
        api.get_json(Service::Backend, "/farmer_summary", &[]).await
    }
}

#[async_trait]
impl RemoteUpdate for Farmers {
    async fn update(
        &self,
        api: &UpstreamApi,
        key: &String,
        patch: &FarmerPatch,
        _files: &Attachments,
    ) -> Result<(), ApiError> {
        let body = FarmerUpdate {
            grower_id: key,
            patch,
        };
        api.post_json(Service::Backend, "/update_farmer_summary", &body)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteDelete for Farmers {
    async fn remove(&self, api: &UpstreamApi, key: &String) -> Result<(), ApiError> {
        api.post_json(
            Service::Backend,
            "/delete_farmer_summary",
            &serde_json::json!({ "grower_id": key }),
        )
        .await?;
        Ok(())
    }
}

/// Download the farmer spreadsheet (`GET /export-user-data`).
pub async fn export(api: &UpstreamApi) -> Result<Vec<u8>, ApiError> {
    let bytes = api.get_bytes(Service::Backend, "/export-user-data").await?;
    tracing::info!(bytes = bytes.len(), "Exported farmer spreadsheet");
    Ok(bytes)
}
