use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::MEDIA_BODY_LIMIT;
use crate::handlers::quality;
use crate::state::AppState;

/// Routes mounted at `/quality`.
///
/// ```text
/// GET  /{farmer_id}                           -> view
/// POST /{farmer_id}/mount                     -> mount
/// POST /{farmer_id}/unmount                   -> unmount
/// POST /{farmer_id}/samples/{index}/detect    -> detect
/// POST /{farmer_id}/detect-all                -> detect_all
/// POST /{farmer_id}/upload                    -> upload (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{farmer_id}", get(quality::view))
        .route("/{farmer_id}/mount", post(quality::mount))
        .route("/{farmer_id}/unmount", post(quality::unmount))
        .route(
            "/{farmer_id}/samples/{index}/detect",
            post(quality::detect),
        )
        .route("/{farmer_id}/detect-all", post(quality::detect_all))
        .route(
            "/{farmer_id}/upload",
            post(quality::upload).layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT)),
        )
}
