//! Upstream entity models and the DTOs submitted back to the backend.

pub mod advisory;
pub mod advisory_type;
pub mod auth;
pub mod enquiry;
pub mod farmer;
pub mod officer;
pub mod stats;

pub use advisory::{Advisory, AdvisoryCategory, AdvisoryDraft};
pub use advisory_type::{AdvisoryType, NewAdvisoryType};
pub use auth::{LoginData, LoginRequest, LoginResponse};
pub use enquiry::{Enquiry, EnquiryReply, ReplyDraft};
pub use farmer::{Farmer, FarmerPatch};
pub use officer::{NewOfficer, Officer, OfficerStatusUpdate};
pub use stats::{Breadcrumb, ImmobileData, StatsForm, StatsUpdate};
