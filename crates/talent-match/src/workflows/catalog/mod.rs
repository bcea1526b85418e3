//! Job posting catalog: recruiter drafts, the storage seam, and CSV seeding.

pub mod domain;
pub mod import;
pub mod repository;

pub use domain::{CatalogError, JobPosting, PostingDraft, PostingId, RecruiterId};
pub use import::{CatalogImportError, CatalogImporter};
pub use repository::CatalogRepository;
