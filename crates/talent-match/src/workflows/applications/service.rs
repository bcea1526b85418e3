use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Application, ApplicationId, Decision};
use super::lifecycle::{self, LifecycleError};
use super::repository::{ApplicantView, ApplicationRepository, CandidateApplicationView};
use crate::workflows::candidates::{CandidateId, ProfileRepository};
use crate::workflows::catalog::{CatalogRepository, JobPosting, PostingId, RecruiterId};
use crate::workflows::matching::{ensure_can_apply, score, Ineligible};
use crate::workflows::store::RepositoryError;

/// Service composing the lifecycle rules with the application, catalog and profile stores.
pub struct ApplicationService<R, C, P> {
    repository: Arc<R>,
    catalog: Arc<C>,
    profiles: Arc<P>,
    sequence: AtomicU64,
}

impl<R, C, P> ApplicationService<R, C, P>
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<C>, profiles: Arc<P>) -> Self {
        Self {
            repository,
            catalog,
            profiles,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_application_id(&self) -> ApplicationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApplicationId(format!("app-{id:06}"))
    }

    /// Submit a new application for a candidate who passes the eligibility gate.
    pub fn submit(
        &self,
        candidate_id: CandidateId,
        posting_id: PostingId,
    ) -> Result<Application, ApplicationServiceError> {
        self.posting(&posting_id)?;

        let skills = self.profiles.skills_of(&candidate_id)?;
        ensure_can_apply(&skills)?;

        let existing = self.repository.find_by_pair(&candidate_id, &posting_id)?;
        let application = lifecycle::submit(
            self.next_application_id(),
            candidate_id,
            posting_id,
            Utc::now(),
            existing.as_ref(),
        )
        .inspect_err(|err| warn!(%err, "application submission refused"))?;

        let stored = match self.repository.insert(application.clone()) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(self.duplicate_of(&application)?);
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            application_id = %stored.id.0,
            candidate_id = %stored.candidate_id.0,
            posting_id = %stored.posting_id.0,
            "application submitted"
        );
        Ok(stored)
    }

    /// Record the posting owner's decision on a pending application.
    pub fn decide(
        &self,
        application_id: &ApplicationId,
        outcome: Decision,
        recruiter: &RecruiterId,
    ) -> Result<Application, ApplicationServiceError> {
        let current = self.get(application_id)?;

        let posting = self.posting(&current.posting_id)?;
        if !posting.is_owned_by(recruiter) {
            return Err(ApplicationServiceError::NotPostingOwner {
                recruiter: recruiter.clone(),
                posting_id: posting.id,
            });
        }

        let decided = lifecycle::decide(&current, outcome, Utc::now())
            .inspect_err(|err| warn!(%err, "decision refused"))?;

        let stored = match self.repository.update_if_status(current.status, decided) {
            Ok(stored) => stored,
            Err(RepositoryError::StatusChanged { actual }) => {
                let err = LifecycleError::InvalidTransition {
                    application_id: application_id.clone(),
                    from: actual,
                    to: outcome.status(),
                };
                warn!(%err, "decision lost to a concurrent update");
                return Err(err.into());
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            application_id = %stored.id.0,
            status = stored.status.label(),
            "application decided"
        );
        Ok(stored)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    /// Applications a candidate has submitted, oldest first.
    pub fn for_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<CandidateApplicationView>, ApplicationServiceError> {
        let mut applications = self.repository.for_candidate(candidate_id)?;
        applications.sort_by(|left, right| left.submitted_at.cmp(&right.submitted_at));

        applications
            .into_iter()
            .map(|application| -> Result<_, ApplicationServiceError> {
                let posting = self.catalog.fetch(&application.posting_id)?;
                Ok(CandidateApplicationView::new(application, posting.as_ref()))
            })
            .collect()
    }

    /// Applicants for a posting, best match first, for the posting's recruiter.
    pub fn applicants(
        &self,
        posting_id: &PostingId,
        recruiter: &RecruiterId,
    ) -> Result<Vec<ApplicantView>, ApplicationServiceError> {
        let posting = self.posting(posting_id)?;
        if !posting.is_owned_by(recruiter) {
            return Err(ApplicationServiceError::NotPostingOwner {
                recruiter: recruiter.clone(),
                posting_id: posting.id,
            });
        }

        let mut applications = self.repository.for_posting(posting_id)?;
        applications.sort_by(|left, right| left.submitted_at.cmp(&right.submitted_at));

        let mut applicants = applications
            .into_iter()
            .map(|application| -> Result<_, ApplicationServiceError> {
                let skills = self.profiles.skills_of(&application.candidate_id)?;
                let result = score(&skills, &posting.required_skills);
                Ok(ApplicantView {
                    application,
                    band: result.band(),
                    result,
                })
            })
            .collect::<Result<Vec<_>, ApplicationServiceError>>()?;

        applicants.sort_by(|left, right| right.result.score.cmp(&left.result.score));
        Ok(applicants)
    }

    fn posting(&self, posting_id: &PostingId) -> Result<JobPosting, ApplicationServiceError> {
        self.catalog
            .fetch(posting_id)?
            .ok_or_else(|| ApplicationServiceError::UnknownPosting {
                posting_id: posting_id.clone(),
            })
    }

    fn duplicate_of(
        &self,
        attempted: &Application,
    ) -> Result<ApplicationServiceError, RepositoryError> {
        let existing = self
            .repository
            .find_by_pair(&attempted.candidate_id, &attempted.posting_id)?
            .ok_or(RepositoryError::Conflict)?;

        Ok(LifecycleError::DuplicateApplication {
            candidate_id: attempted.candidate_id.clone(),
            posting_id: attempted.posting_id.clone(),
            existing: existing.id,
        }
        .into())
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Ineligible(#[from] Ineligible),
    #[error("posting {} does not exist", .posting_id.0)]
    UnknownPosting { posting_id: PostingId },
    #[error("recruiter {} does not own posting {}", .recruiter.0, .posting_id.0)]
    NotPostingOwner {
        recruiter: RecruiterId,
        posting_id: PostingId,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
