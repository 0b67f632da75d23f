use std::sync::Arc;

use rubberwatch_client::api::{ApiError, UpstreamApi};
use rubberwatch_client::collections::{AdvisoryTypes, Advisories, Enquiries, Farmers, Officers};
use rubberwatch_client::controller::ListController;
use rubberwatch_client::quality::QualityReviewer;
use rubberwatch_client::session::SessionContext;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The operator's session, shared with the upstream client.
    pub session: SessionContext,
    pub api: Arc<UpstreamApi>,
    pub pages: Arc<Pages>,
}

/// One controller per page. A page holds state only while mounted.
pub struct Pages {
    pub farmers: ListController<Farmers>,
    pub officers: ListController<Officers>,
    pub advisories: ListController<Advisories>,
    pub advisory_types: ListController<AdvisoryTypes>,
    pub enquiries: ListController<Enquiries>,
    pub quality: QualityReviewer,
}

impl AppState {
    pub fn new(config: ServerConfig, session: SessionContext) -> Result<Self, ApiError> {
        let api = Arc::new(UpstreamApi::new(
            config.upstream.clone(),
            session.clone(),
            config.upstream_timeout(),
        )?);
        let size = config.default_page_size;
        let pages = Pages {
            farmers: ListController::new(Farmers, api.clone(), size),
            officers: ListController::new(Officers, api.clone(), size),
            advisories: ListController::new(Advisories, api.clone(), size),
            advisory_types: ListController::new(AdvisoryTypes, api.clone(), size),
            enquiries: ListController::new(Enquiries, api.clone(), size),
            quality: QualityReviewer::new(api.clone()),
        };
        Ok(Self {
            config: Arc::new(config),
            session,
            api,
            pages: Arc::new(pages),
        })
    }

    /// Close every page, discarding responses still in flight.
    pub async fn unmount_all(&self) {
        let pages = &self.pages;
        tokio::join!(
            pages.farmers.unmount(),
            pages.officers.unmount(),
            pages.advisories.unmount(),
            pages.advisory_types.unmount(),
            pages.enquiries.unmount(),
            pages.quality.unmount(),
        );
    }
}

/// Access to the controller of collection `C`.
pub trait PageOf<C: rubberwatch_client::collections::RemoteCollection> {
    fn page(&self) -> &ListController<C>;
}

macro_rules! page_of {
    ($collection:ty, $field:ident) => {
        impl PageOf<$collection> for Pages {
            fn page(&self) -> &ListController<$collection> {
                &self.$field
            }
        }
    };
}

page_of!(Farmers, farmers);
page_of!(Officers, officers);
page_of!(Advisories, advisories);
page_of!(AdvisoryTypes, advisory_types);
page_of!(Enquiries, enquiries);
