use axum::routing::get;
use axum::Router;

use crate::handlers::prices;
use crate::state::AppState;

/// Routes mounted at `/prices`.
///
/// ```text
/// GET /latest    -> latest
/// GET /trend     -> trend
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/latest", get(prices::latest))
        .route("/trend", get(prices::trend))
}
