use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MatchingConfig;
use crate::workflows::candidates::{CandidateId, CandidateProfile, ProfileRepository};
use crate::workflows::catalog::{
    CatalogError, CatalogRepository, JobPosting, PostingDraft, PostingId,
};
use crate::workflows::matching::{
    can_apply, rank, MatchBand, MatchResult, SkillInput, SkillSet, ZeroScorePolicy,
};
use crate::workflows::store::RepositoryError;

/// Ranked catalog as presented to one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOpportunities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CandidateId>,
    pub can_apply: bool,
    pub zero_score_policy: ZeroScorePolicy,
    pub postings: Vec<RankedOpportunity>,
}

/// Owned ranking entry suitable for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOpportunity {
    pub posting: JobPosting,
    pub band: MatchBand,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Candidate-facing service: skill uploads, posting creation, and the ranked catalog view.
pub struct OpportunityService<C, P> {
    catalog: Arc<C>,
    profiles: Arc<P>,
    config: MatchingConfig,
    sequence: AtomicU64,
}

impl<C, P> OpportunityService<C, P>
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(catalog: Arc<C>, profiles: Arc<P>, config: MatchingConfig) -> Self {
        Self {
            catalog,
            profiles,
            config,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> MatchingConfig {
        self.config
    }

    fn next_posting_id(&self) -> PostingId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        PostingId(format!("post-{id:06}"))
    }

    /// Rank the catalog for `candidate`; an absent or unknown candidate ranks with no skills.
    pub fn ranked_for(
        &self,
        candidate: Option<&CandidateId>,
        policy: Option<ZeroScorePolicy>,
    ) -> Result<RankedOpportunities, OpportunityError> {
        let skills = match candidate {
            Some(id) => self.profiles.skills_of(id)?,
            None => SkillSet::new(),
        };
        let policy = policy.unwrap_or(self.config.zero_score_policy);
        let catalog = self.catalog.list()?;

        let postings = rank(&skills, &catalog, policy)
            .into_iter()
            .map(|entry| RankedOpportunity {
                posting: entry.posting.clone(),
                band: entry.band(),
                result: entry.result,
            })
            .collect::<Vec<_>>();

        debug!(
            candidate = candidate.map(|id| id.0.as_str()).unwrap_or("anonymous"),
            %policy,
            catalog = catalog.len(),
            shown = postings.len(),
            "ranked catalog"
        );

        Ok(RankedOpportunities {
            candidate_id: candidate.cloned(),
            can_apply: can_apply(&skills),
            zero_score_policy: policy,
            postings,
        })
    }

    /// Validate and store a recruiter's new posting.
    pub fn create_posting(&self, draft: PostingDraft) -> Result<JobPosting, OpportunityError> {
        let posting =
            JobPosting::from_draft(self.next_posting_id(), draft, self.config.skill_delimiter)?;
        let stored = self.catalog.insert(posting)?;
        info!(
            posting_id = %stored.id.0,
            recruiter_id = %stored.recruiter_id.0,
            required_skills = stored.required_skills.len(),
            "posting created"
        );
        Ok(stored)
    }

    pub fn posting(&self, id: &PostingId) -> Result<JobPosting, OpportunityError> {
        self.catalog
            .fetch(id)?
            .ok_or_else(|| OpportunityError::PostingNotFound {
                posting_id: id.clone(),
            })
    }

    /// Replace the candidate's skills with freshly extracted or typed input.
    pub fn upload_skills(
        &self,
        candidate: CandidateId,
        input: &SkillInput,
    ) -> Result<CandidateProfile, OpportunityError> {
        let skills = input.normalize(self.config.skill_delimiter);
        let now = Utc::now();

        let profile = match self.profiles.fetch(&candidate)? {
            Some(existing) => existing.with_skills(skills, now),
            None => CandidateProfile::new(candidate, skills, now),
        };

        let stored = self.profiles.upsert(profile)?;
        info!(
            candidate_id = %stored.id.0,
            skills = stored.skills.len(),
            "candidate skills replaced"
        );
        Ok(stored)
    }

    pub fn profile(&self, candidate: &CandidateId) -> Result<CandidateProfile, OpportunityError> {
        self.profiles
            .fetch(candidate)?
            .ok_or_else(|| OpportunityError::CandidateNotFound {
                candidate_id: candidate.clone(),
            })
    }
}

/// Error raised by the opportunity service.
#[derive(Debug, thiserror::Error)]
pub enum OpportunityError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("posting {} does not exist", .posting_id.0)]
    PostingNotFound { posting_id: PostingId },
    #[error("candidate {} has no profile", .candidate_id.0)]
    CandidateNotFound { candidate_id: CandidateId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
