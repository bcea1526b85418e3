use serde::{Deserialize, Serialize};

use crate::workflows::matching::{SkillInput, SkillSet};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostingId(pub String);

/// Identifier of the recruiter who owns a posting and decides on its applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterId(pub String);

/// A job opening advertised to candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub description: String,
    pub recruiter_id: RecruiterId,
    pub required_skills: SkillSet,
}

impl JobPosting {
    /// Validate a recruiter draft and attach the assigned identifier.
    pub fn from_draft(
        id: PostingId,
        draft: PostingDraft,
        delimiter: char,
    ) -> Result<Self, CatalogError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(CatalogError::MissingTitle);
        }

        let required_skills = draft.required_skills.normalize(delimiter);
        if required_skills.is_empty() {
            return Err(CatalogError::NoRequiredSkills);
        }

        Ok(Self {
            id,
            title,
            organization: draft.organization.trim().to_string(),
            description: draft.description.trim().to_string(),
            recruiter_id: draft.recruiter_id,
            required_skills,
        })
    }

    pub fn is_owned_by(&self, recruiter: &RecruiterId) -> bool {
        &self.recruiter_id == recruiter
    }
}

/// Recruiter-supplied fields for a new posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDraft {
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub description: String,
    pub recruiter_id: RecruiterId,
    #[serde(default)]
    pub required_skills: SkillInput,
}

/// Validation failures for recruiter drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("a posting needs a title")]
    MissingTitle,
    #[error("a posting needs at least one required skill")]
    NoRequiredSkills,
}
