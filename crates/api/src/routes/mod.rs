pub mod advisories;
pub mod advisory_types;
pub mod auth;
pub mod dashboard;
pub mod enquiries;
pub mod farmers;
pub mod health;
pub mod layout;
pub mod officers;
pub mod pages;
pub mod prices;
pub mod quality;

use axum::Router;

use crate::state::AppState;

/// Largest multipart body accepted by the routes that take media files.
pub const MEDIA_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      sign in (public)
/// /auth/logout                                     sign out
///
/// /routes/resolve                                  what a browser path shows (public)
/// /layout                                          page shell for a path
/// /layout/theme                                    set or toggle theme (PUT)
///
/// /dashboard                                       overview charts
/// /dashboard/stats                                 update program statistics (PUT)
/// /prices/latest                                   latest price board
/// /prices/trend                                    price trend series
///
/// /farmers                                         view
/// /farmers/mount, /unmount, /cancel                page lifecycle
/// /farmers/export                                  spreadsheet download
/// /farmers/{grower_id}                             update (PUT), delete
///
/// /officers                                        view, register
/// /officers/mount, /unmount, /cancel               page lifecycle
/// /officers/{id}/status                            toggle status (POST)
///
/// /advisories                                      view, create (multipart)
/// /advisories/mount, /unmount, /cancel             page lifecycle
/// /advisories/{id}                                 update (multipart), delete
///
/// /advisory-types                                  view, add
/// /advisory-types/mount, /unmount, /cancel         page lifecycle
/// /advisory-types/{id}                             delete
///
/// /enquiries                                       view
/// /enquiries/mount, /unmount, /cancel              page lifecycle
/// /enquiries/{id}/reply                            reply (multipart)
/// /enquiries/{id}                                  delete
///
/// /quality/{farmer_id}                             filtered samples
/// /quality/{farmer_id}/mount, /unmount             page lifecycle
/// /quality/{farmer_id}/samples/{index}/detect      detect one sample
/// /quality/{farmer_id}/detect-all                  detect every filtered sample
/// /quality/{farmer_id}/upload                      upload graded sample (multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session.
        .nest("/auth", auth::router())
        // Navigation, page shell and theme.
        .nest("/routes", layout::routes_router())
        .nest("/layout", layout::router())
        // Overview and market prices.
        .nest("/dashboard", dashboard::router())
        .nest("/prices", prices::router())
        // List pages.
        .nest("/farmers", farmers::router())
        .nest("/officers", officers::router())
        .nest("/advisories", advisories::router())
        .nest("/advisory-types", advisory_types::router())
        .nest("/enquiries", enquiries::router())
        // Farmer quality review.
        .nest("/quality", quality::router())
}
