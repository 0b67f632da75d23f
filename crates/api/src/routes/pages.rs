//! Routes every list page has.

use axum::routing::{get, post};
use axum::Router;

use rubberwatch_client::collections::RemoteCollection;

use crate::handlers::pages;
use crate::state::{AppState, PageOf, Pages};

/// Lifecycle and view routes of the page for collection `C`.
///
/// ```text
/// GET  /          -> view
/// POST /mount     -> mount
/// POST /unmount   -> unmount
/// POST /cancel    -> cancel
/// ```
pub fn lifecycle<C>() -> Router<AppState>
where
    C: RemoteCollection,
    Pages: PageOf<C>,
{
    Router::new()
        .route("/", get(pages::view::<C>))
        .route("/mount", post(pages::mount::<C>))
        .route("/unmount", post(pages::unmount::<C>))
        .route("/cancel", post(pages::cancel::<C>))
}
