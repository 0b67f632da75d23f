//! Shared helpers for client integration tests.

#![allow(dead_code)]

pub mod upstream;

use std::sync::Arc;
use std::time::Duration;

use rubberwatch_client::api::UpstreamApi;
use rubberwatch_client::session::SessionContext;
use rubberwatch_core::session::StoredState;

pub use upstream::MockUpstream;

/// Session state of a signed-in operator.
pub fn signed_in_state() -> StoredState {
    StoredState {
        token: Some(upstream::ADMIN_TOKEN.to_string()),
        name: Some("Admin".to_string()),
        ..Default::default()
    }
}

/// An API client pointed at `mock`, signed in.
pub fn api_for(mock: &MockUpstream) -> Arc<UpstreamApi> {
    let session = SessionContext::in_memory(signed_in_state());
    Arc::new(UpstreamApi::new(mock.urls(), session, Duration::from_secs(5)).unwrap())
}
