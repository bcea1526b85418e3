use chrono::{DateTime, Utc};

use super::domain::{Application, ApplicationId, ApplicationStatus, Decision};
use crate::workflows::candidates::CandidateId;
use crate::workflows::catalog::PostingId;

/// Conditions the lifecycle reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("application {} cannot move from {from} to {to}", .application_id.0)]
    InvalidTransition {
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(
        "candidate {} already applied to posting {} (application {})",
        .candidate_id.0,
        .posting_id.0,
        .existing.0
    )]
    DuplicateApplication {
        candidate_id: CandidateId,
        posting_id: PostingId,
        existing: ApplicationId,
    },
}

/// Create a pending application unless `existing` already covers the same pair.
///
/// `existing` is whatever the caller's storage knows about the (candidate, posting) pair; an
/// application in any state, terminal included, blocks a second submission.
pub fn submit(
    id: ApplicationId,
    candidate_id: CandidateId,
    posting_id: PostingId,
    submitted_at: DateTime<Utc>,
    existing: Option<&Application>,
) -> Result<Application, LifecycleError> {
    if let Some(previous) = existing.filter(|app| app.is_for(&candidate_id, &posting_id)) {
        return Err(LifecycleError::DuplicateApplication {
            candidate_id,
            posting_id,
            existing: previous.id.clone(),
        });
    }

    Ok(Application {
        id,
        posting_id,
        candidate_id,
        status: ApplicationStatus::Pending,
        submitted_at,
        decided_at: None,
    })
}

/// Move a pending application to the reviewer's outcome. Terminal states never change.
pub fn decide(
    application: &Application,
    outcome: Decision,
    decided_at: DateTime<Utc>,
) -> Result<Application, LifecycleError> {
    let to = outcome.status();
    if application.status != ApplicationStatus::Pending {
        return Err(LifecycleError::InvalidTransition {
            application_id: application.id.clone(),
            from: application.status,
            to,
        });
    }

    Ok(Application {
        status: to,
        decided_at: Some(decided_at),
        ..application.clone()
    })
}
