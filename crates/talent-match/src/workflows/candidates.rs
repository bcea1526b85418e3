use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::matching::SkillSet;
use crate::workflows::store::RepositoryError;

/// Identifier of a candidate as resolved by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// The candidate's recognized skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub skills: SkillSet,
    pub updated_at: DateTime<Utc>,
}

impl CandidateProfile {
    pub fn new(id: CandidateId, skills: SkillSet, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            skills,
            updated_at,
        }
    }

    /// Replace the skill set wholesale; a re-upload never merges with earlier skills.
    pub fn with_skills(&self, skills: SkillSet, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            skills,
            updated_at,
        }
    }
}

/// Storage abstraction for candidate profiles.
pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError>;
    fn upsert(&self, profile: CandidateProfile) -> Result<CandidateProfile, RepositoryError>;

    /// Skills for ranking and eligibility; unknown candidates have none.
    fn skills_of(&self, id: &CandidateId) -> Result<SkillSet, RepositoryError> {
        Ok(self
            .fetch(id)?
            .map(|profile| profile.skills)
            .unwrap_or_default())
    }
}
