//! Candidate-facing catalog views: ranked opportunities, posting creation, and skill uploads.

pub mod router;
pub mod service;


pub use router::opportunity_router;
pub use service::{OpportunityError, OpportunityService, RankedOpportunities, RankedOpportunity};
