use super::domain::{JobPosting, PostingId, RecruiterId};
use crate::workflows::store::RepositoryError;

/// Storage abstraction for the posting catalog.
///
/// `list` returns postings in catalog order; ranking ties are broken by that order.
pub trait CatalogRepository: Send + Sync {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError>;
    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError>;

    fn by_recruiter(&self, recruiter: &RecruiterId) -> Result<Vec<JobPosting>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|posting| posting.is_owned_by(recruiter))
            .collect())
    }
}
