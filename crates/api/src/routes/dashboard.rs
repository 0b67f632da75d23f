use axum::routing::{get, put};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /          -> overview
/// PUT /stats     -> update_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::overview))
        .route("/stats", put(dashboard::update_stats))
}
