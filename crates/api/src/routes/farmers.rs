use axum::routing::{get, put};
use axum::Router;

use rubberwatch_client::collections::Farmers;

use super::pages::lifecycle;
use crate::handlers::{farmers, pages};
use crate::state::AppState;

/// Routes mounted at `/farmers`.
///
/// ```text
/// GET    /export          -> export
/// PUT    /{grower_id}     -> update
/// DELETE /{grower_id}     -> remove
/// ```
pub fn router() -> Router<AppState> {
    lifecycle::<Farmers>()
        .route("/export", get(farmers::export))
        .route(
            "/{grower_id}",
            put(farmers::update).delete(pages::remove::<Farmers>),
        )
}
