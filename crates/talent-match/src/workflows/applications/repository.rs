use serde::Serialize;

use super::domain::{Application, ApplicationId, ApplicationStatus};
use crate::workflows::candidates::CandidateId;
use crate::workflows::catalog::{JobPosting, PostingId};
use crate::workflows::matching::{MatchBand, MatchResult};
use crate::workflows::store::RepositoryError;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations own the one-application-per-pair rule: `insert` must fail with
/// [`RepositoryError::Conflict`] when the pair is already stored.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_by_pair(
        &self,
        candidate: &CandidateId,
        posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError>;
    fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError>;

    /// Store `application` only if the stored copy still has status `expected`.
    ///
    /// Returns [`RepositoryError::StatusChanged`] with the stored status otherwise, which is how
    /// concurrent decisions on the same application resolve to a single winner.
    fn update_if_status(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<Application, RepositoryError>;
}

/// Application together with the posting context a candidate sees in their dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub posting_title: String,
    pub organization: String,
}

impl CandidateApplicationView {
    pub fn new(application: Application, posting: Option<&JobPosting>) -> Self {
        let (posting_title, organization) = posting
            .map(|posting| (posting.title.clone(), posting.organization.clone()))
            .unwrap_or_default();
        Self {
            application,
            posting_title,
            organization,
        }
    }
}

/// Applicant entry in the recruiter review view, scored against the posting.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantView {
    #[serde(flatten)]
    pub application: Application,
    pub band: MatchBand,
    #[serde(flatten)]
    pub result: MatchResult,
}
