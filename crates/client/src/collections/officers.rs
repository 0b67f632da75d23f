//! Field officers: list, register and status toggle.

use async_trait::async_trait;

use rubberwatch_core::attachments::Attachments;
use rubberwatch_core::models::{NewOfficer, Officer, OfficerStatusUpdate};
use rubberwatch_core::types::RecordId;

use super::{RemoteCollection, RemoteCreate};
use crate::api::{ApiError, Service, UpstreamApi};
use crate::controller::{ListController, SnapshotOf};
use crate::error::ClientError;

pub struct Officers;

#[async_trait]
impl RemoteCollection for Officers {
    type Item = Officer;
    const PAGE: &'static str = "officers";

    async fn list(&self, api: &UpstreamApi) -> Result<Vec<Officer>, ApiError> {
        api.get_json(Service::Backend, "/getOfficerData", &[]).await
    }
}

#[async_trait]
impl RemoteCreate for Officers {
    type Draft = NewOfficer;

    async fn create(
        &self,
        api: &UpstreamApi,
        draft: &NewOfficer,
        _files: &Attachments,
    ) -> Result<Option<Officer>, ApiError> {
        let reply = api.post_json(Service::Backend, "/register", draft).await?;
        Ok(UpstreamApi::echoed(reply))
    }

    fn provisional(&self, draft: NewOfficer) -> Officer {
        draft.into_officer(RecordId::provisional())
    }
}

/// `POST /updateOfficerStatus`.
pub async fn set_status(api: &UpstreamApi, update: &OfficerStatusUpdate) -> Result<(), ApiError> {
    api.post_json(Service::Backend, "/updateOfficerStatus", update)
        .await?;
    Ok(())
}

impl ListController<Officers> {
    /// Flip an officer's status.
    ///
    /// The row changes immediately; if the backend refuses, the row is put
    /// back and the error is reported.
    pub async fn toggle_status(&self, id: RecordId) -> Result<SnapshotOf<Officers>, ClientError> {
        let mut requested = false;
        let token = self
            .try_with_state(|state| {
                let officer = state.view.modify(&id, |o| o.status = !o.status)?;
                requested = officer.status;
                Ok(())
            })
            .await?;

        let update = OfficerStatusUpdate {
            id: id.clone(),
            status: requested,
        };
        let result = set_status(self.api(), &update).await;

        let mut guard = self.current(&token).await?;
        let state = Self::state_mut(&mut guard)?;
        match result {
            Ok(()) => {
                tracing::info!(%id, status = requested, "Officer status changed");
                state.clear_error();
                Ok(state.snapshot())
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Officer status change failed, rolling back");
                // The row may have been reloaded meanwhile; only restore what we flipped.
                let _ = state.view.modify(&id, |o| {
                    if o.status == requested {
                        o.status = !requested;
                    }
                });
                state.fail(e.to_string());
                Err(e.into())
            }
        }
    }
}
