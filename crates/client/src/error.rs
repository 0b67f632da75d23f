use rubberwatch_core::error::CoreError;

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The page was unmounted, remounted or reloaded while a request was in
    /// flight; its response was discarded.
    #[error("The {0} page changed before the response arrived")]
    Stale(&'static str),

    /// An operation was issued for a page that has not been mounted.
    #[error("The {0} page is not mounted")]
    NotMounted(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
