use axum::routing::post;
use axum::Router;

use rubberwatch_client::collections::Officers;

use super::pages::lifecycle;
use crate::handlers::officers;
use crate::state::AppState;

/// Routes mounted at `/officers`.
///
/// ```text
/// POST /               -> register
/// POST /{id}/status    -> toggle_status
/// ```
pub fn router() -> Router<AppState> {
    lifecycle::<Officers>()
        .route("/", post(officers::register))
        .route("/{id}/status", post(officers::toggle_status))
}
