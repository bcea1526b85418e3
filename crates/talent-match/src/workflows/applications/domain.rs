use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::candidates::CandidateId;
use crate::workflows::catalog::PostingId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// A candidate's request to be considered for a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub posting_id: PostingId,
    pub candidate_id: CandidateId,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn is_for(&self, candidate: &CandidateId, posting: &PostingId) -> bool {
        &self.candidate_id == candidate && &self.posting_id == posting
    }
}

/// High level status tracked throughout the application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Shortlisted")]
    Shortlisted,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reviewer outcome for a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[serde(alias = "Shortlisted")]
    Shortlisted,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl Decision {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            Decision::Shortlisted => ApplicationStatus::Shortlisted,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl From<Decision> for ApplicationStatus {
    fn from(value: Decision) -> Self {
        value.status()
    }
}
