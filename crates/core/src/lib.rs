//! Rubberwatch domain library.
//!
//! Pure logic shared by the upstream client and the dashboard server: entity
//! models, form validation, the searchable/paginated list view, chart and
//! price-series transforms, quality review state, route gating and theme
//! tokens. Nothing in this crate performs I/O.

pub mod attachments;
pub mod charts;
pub mod error;
pub mod listing;
pub mod models;
pub mod navigation;
pub mod prices;
pub mod quality;
pub mod session;
pub mod theme;
pub mod types;
pub mod validation;
