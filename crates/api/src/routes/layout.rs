use axum::routing::{get, put};
use axum::Router;

use crate::handlers::layout;
use crate::state::AppState;

/// Routes mounted at `/layout`.
///
/// ```text
/// GET /          -> shell
/// PUT /theme     -> set_theme
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(layout::shell))
        .route("/theme", put(layout::set_theme))
}

/// Routes mounted at `/routes`.
///
/// ```text
/// GET /resolve   -> resolve (public)
/// ```
pub fn routes_router() -> Router<AppState> {
    Router::new().route("/resolve", get(layout::resolve))
}
