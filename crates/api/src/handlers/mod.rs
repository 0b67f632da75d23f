//! Request handlers, one module per dashboard page.
//!
//! List pages share the generic handlers in [`pages`]; each page module adds
//! the operations only that page has. Handlers delegate to the page
//! controllers in `rubberwatch_client` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod advisories;
pub mod advisory_types;
pub mod auth;
pub mod dashboard;
pub mod enquiries;
pub mod farmers;
pub mod form;
pub mod layout;
pub mod officers;
pub mod pages;
pub mod prices;
pub mod quality;
