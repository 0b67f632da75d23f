//! Upstream client library for the rubberwatch dashboard.
//!
//! Provides the REST wrapper for the program backend, price feed and sheet
//! quality services, the persisted session context, the remote collections
//! behind each list page, and the async controllers that keep a page's local
//! state consistent with those services.

pub mod api;
pub mod collections;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod quality;
pub mod session;
