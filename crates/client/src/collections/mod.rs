//! Remote collections: the upstream endpoints behind each list page.
//!
//! A collection knows how to fetch its entities and which write operations
//! the backend supports for them. Each write capability is its own trait so
//! a page only exposes the operations its backend actually has.

pub mod advisories;
pub mod advisory_types;
pub mod enquiries;
pub mod farmers;
pub mod officers;

use async_trait::async_trait;
use serde::Serialize;
use validator::Validate;

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::listing::{Listable, Patchable};

use crate::api::{ApiError, UpstreamApi};

pub use advisories::Advisories;
pub use advisory_types::AdvisoryTypes;
pub use enquiries::Enquiries;
pub use farmers::Farmers;
pub use officers::Officers;

/// Key type of a collection's entities.
pub type KeyOf<C> = <<C as RemoteCollection>::Item as Listable>::Key;

/// Patch type of a collection's entities.
pub type PatchOf<C> = <<C as RemoteCollection>::Item as Patchable>::Patch;

/// A list endpoint.
#[async_trait]
pub trait RemoteCollection: Send + Sync + 'static {
    type Item: Listable + Clone + Serialize + Send + Sync + 'static;

    /// Page name used in logs and errors.
    const PAGE: &'static str;

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<Self::Item>, ApiError>;
}

/// A collection that accepts new entities.
#[async_trait]
pub trait RemoteCreate: RemoteCollection {
    type Draft: Validate + Send + Sync;

    /// Submit `draft`. Returns the entity if the backend echoed one.
    async fn create(
        &self,
        api: &UpstreamApi,
        draft: &Self::Draft,
        files: &Attachments,
    ) -> Result<Option<Self::Item>, ApiError>;

    /// The entity to show for an accepted draft the backend did not echo.
    fn provisional(&self, draft: Self::Draft) -> Self::Item;
}

/// A collection that accepts partial updates.
#[async_trait]
pub trait RemoteUpdate: RemoteCollection
where
    Self::Item: Patchable,
{
    async fn update(
        &self,
        api: &UpstreamApi,
        key: &KeyOf<Self>,
        patch: &PatchOf<Self>,
        files: &Attachments,
    ) -> Result<(), ApiError>;
}

/// A collection that accepts deletions.
#[async_trait]
pub trait RemoteDelete: RemoteCollection {
    async fn remove(&self, api: &UpstreamApi, key: &KeyOf<Self>) -> Result<(), ApiError>;
}
