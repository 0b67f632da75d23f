use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, post};
use axum::Router;

use rubberwatch_client::collections::Enquiries;

use super::pages::lifecycle;
use super::MEDIA_BODY_LIMIT;
use crate::handlers::{enquiries, pages};
use crate::state::AppState;

/// Routes mounted at `/enquiries`.
///
/// ```text
/// POST   /{id}/reply  -> reply (multipart)
/// DELETE /{id}        -> remove
/// ```
pub fn router() -> Router<AppState> {
    lifecycle::<Enquiries>()
        .route(
            "/{id}/reply",
            post(enquiries::reply).layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT)),
        )
        .route("/{id}", delete(pages::remove::<Enquiries>))
}
