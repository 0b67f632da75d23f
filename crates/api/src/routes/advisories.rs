use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, post, put};
use axum::Router;

use rubberwatch_client::collections::Advisories;

use super::pages::lifecycle;
use super::MEDIA_BODY_LIMIT;
use crate::handlers::{advisories, pages};
use crate::state::AppState;

/// Routes mounted at `/advisories`.
///
/// ```text
/// POST   /        -> create (multipart)
/// PUT    /{id}    -> update (multipart)
/// DELETE /{id}    -> remove
/// ```
pub fn router() -> Router<AppState> {
    lifecycle::<Advisories>()
        .route(
            "/",
            post(advisories::create).layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT)),
        )
        .route(
            "/{id}",
            put(advisories::update)
                .layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT))
                .merge(delete(pages::remove::<Advisories>)),
        )
}
