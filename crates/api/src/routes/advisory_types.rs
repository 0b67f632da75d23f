use axum::routing::{delete, post};
use axum::Router;

use rubberwatch_client::collections::AdvisoryTypes;

use super::pages::lifecycle;
use crate::handlers::{advisory_types, pages};
use crate::state::AppState;

/// Routes mounted at `/advisory-types`.
///
/// ```text
/// POST   /        -> create
/// DELETE /{id}    -> remove
/// ```
pub fn router() -> Router<AppState> {
    lifecycle::<AdvisoryTypes>()
        .route("/", post(advisory_types::create))
        .route("/{id}", delete(pages::remove::<AdvisoryTypes>))
}
