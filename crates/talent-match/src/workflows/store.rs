use crate::workflows::applications::ApplicationStatus;

/// Error enumeration shared by the catalog, profile, and application repositories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    /// A conditional update found the record in a different state than expected.
    #[error("record was updated concurrently; current status is {actual}")]
    StatusChanged { actual: ApplicationStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
