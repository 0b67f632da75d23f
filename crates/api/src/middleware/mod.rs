//! Request extractors that gate routes behind the operator's session.
//!
//! - [`auth::RequireSession`] -- Requires the session's Bearer token.

pub mod auth;
