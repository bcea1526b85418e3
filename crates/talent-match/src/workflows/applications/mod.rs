//! Candidate applications: the submit/decide lifecycle, its storage seam, and HTTP endpoints.
//!
//! The lifecycle functions are pure; [`ApplicationService`] wires them to the injected
//! application, catalog, and profile repositories and is the only place state changes happen.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{Application, ApplicationId, ApplicationStatus, Decision};
pub use lifecycle::LifecycleError;
pub use repository::{ApplicantView, ApplicationRepository, CandidateApplicationView};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
