use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_match::config::AppConfig;
use talent_match::error::AppError;
use talent_match::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus,
};
use talent_match::workflows::candidates::{CandidateId, CandidateProfile, ProfileRepository};
use talent_match::workflows::catalog::{
    CatalogImporter, CatalogRepository, JobPosting, PostingId, RecruiterId,
};
use talent_match::workflows::matching::SkillSet;
use talent_match::workflows::store::RepositoryError;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

/// Posting catalog kept in insertion order so ranking ties follow the seed file.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalogRepository {
    postings: Arc<Mutex<Vec<JobPosting>>>,
}

impl InMemoryCatalogRepository {
    pub(crate) fn seeded(postings: Vec<JobPosting>) -> Result<Self, RepositoryError> {
        let repository = Self::default();
        for posting in postings {
            repository.insert(posting)?;
        }
        Ok(repository)
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = lock(&self.postings)?;
        if guard.iter().any(|existing| existing.id == posting.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(posting.clone());
        Ok(posting)
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = lock(&self.postings)?;
        Ok(guard.iter().find(|posting| &posting.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Ok(lock(&self.postings)?.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        Ok(lock(&self.profiles)?.get(id).cloned())
    }

    fn upsert(&self, profile: CandidateProfile) -> Result<CandidateProfile, RepositoryError> {
        lock(&self.profiles)?.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

/// Application store; the id map and the candidate/posting pair are both unique.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let taken = guard.contains_key(&application.id)
            || guard.values().any(|existing| {
                existing.is_for(&application.candidate_id, &application.posting_id)
            });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn find_by_pair(
        &self,
        candidate: &CandidateId,
        posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .find(|application| application.is_for(candidate, posting))
            .cloned())
    }

    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|application| &application.candidate_id == candidate)
            .cloned()
            .collect())
    }

    fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|application| &application.posting_id == posting)
            .cloned()
            .collect())
    }

    fn update_if_status(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard
            .get_mut(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected {
            return Err(RepositoryError::StatusChanged {
                actual: stored.status,
            });
        }
        *stored = application.clone();
        Ok(application)
    }
}

/// Built-in catalog used when no CSV seed is configured.
pub(crate) fn demo_catalog() -> Vec<JobPosting> {
    let entry = |id: &str, title: &str, organization: &str, recruiter: &str, skills: &[&str]| {
        JobPosting {
            id: PostingId(id.to_string()),
            title: title.to_string(),
            organization: organization.to_string(),
            description: String::new(),
            recruiter_id: RecruiterId(recruiter.to_string()),
            required_skills: SkillSet::from_tokens(skills),
        }
    };

    vec![
        entry(
            "1",
            "Frontend Developer",
            "TechCorp",
            "recruiter-techcorp",
            &["react", "javascript", "css"],
        ),
        entry(
            "2",
            "Backend Developer",
            "DataWorks",
            "recruiter-dataworks",
            &["node", "express", "mongodb"],
        ),
        entry(
            "3",
            "Full Stack Engineer",
            "BuildIt",
            "recruiter-buildit",
            &["react", "node", "sql"],
        ),
    ]
}

/// Load the startup catalog from `APP_CATALOG_CSV`, falling back to the built-in postings.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<Vec<JobPosting>, AppError> {
    match &config.catalog.seed_csv {
        Some(path) => {
            let postings = CatalogImporter::from_path(path, config.matching.skill_delimiter)?;
            info!(path = %path.display(), postings = postings.len(), "catalog imported");
            Ok(postings)
        }
        None => Ok(demo_catalog()),
    }
}
