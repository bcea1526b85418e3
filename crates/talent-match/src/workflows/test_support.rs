use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::MatchingConfig;
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationService, ApplicationStatus,
};
use crate::workflows::candidates::{CandidateId, CandidateProfile, ProfileRepository};
use crate::workflows::catalog::{CatalogRepository, JobPosting, PostingId, RecruiterId};
use crate::workflows::matching::SkillSet;
use crate::workflows::opportunities::OpportunityService;
use crate::workflows::store::RepositoryError;

pub(crate) fn posting(id: &str, recruiter: &str, required: &[&str]) -> JobPosting {
    JobPosting {
        id: PostingId(id.to_string()),
        title: format!("Role {id}"),
        organization: "TechCorp".to_string(),
        description: String::new(),
        recruiter_id: RecruiterId(recruiter.to_string()),
        required_skills: SkillSet::from_tokens(required),
    }
}

pub(crate) fn sample_catalog() -> Vec<JobPosting> {
    vec![
        posting("frontend", "recruiter-1", &["react", "javascript", "css"]),
        posting("backend", "recruiter-1", &["node", "express", "mongodb"]),
        posting("fullstack", "recruiter-2", &["react", "node", "sql"]),
    ]
}

pub(crate) fn profile(id: &str, skills: &[&str]) -> CandidateProfile {
    CandidateProfile::new(
        CandidateId(id.to_string()),
        SkillSet::from_tokens(skills),
        chrono::Utc::now(),
    )
}

#[derive(Default, Clone)]
pub(crate) struct MemoryCatalog {
    postings: Arc<Mutex<Vec<JobPosting>>>,
}

impl MemoryCatalog {
    pub(crate) fn with(postings: Vec<JobPosting>) -> Self {
        Self {
            postings: Arc::new(Mutex::new(postings)),
        }
    }
}

impl CatalogRepository for MemoryCatalog {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.postings.lock().expect("catalog mutex poisoned");
        if guard.iter().any(|existing| existing.id == posting.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(posting.clone());
        Ok(posting)
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.postings.lock().expect("catalog mutex poisoned");
        Ok(guard.iter().find(|posting| &posting.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Ok(self.postings.lock().expect("catalog mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryProfiles {
    profiles: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
}

impl MemoryProfiles {
    pub(crate) fn with(profiles: Vec<CandidateProfile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self {
            profiles: Arc::new(Mutex::new(map)),
        }
    }
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: CandidateProfile) -> Result<CandidateProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryApplications {
    pub(crate) records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_pair(
        &self,
        candidate: &CandidateId,
        posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|application| application.is_for(candidate, posting))
            .cloned())
    }

    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.candidate_id == candidate)
            .cloned()
            .collect())
    }

    fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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

/// Repository whose first pair lookup misses, so pair uniqueness is only caught on insert.
#[derive(Default, Clone)]
pub(crate) struct StaleLookupApplications {
    pub(crate) inner: MemoryApplications,
    lookups: Arc<AtomicUsize>,
}

impl ApplicationRepository for StaleLookupApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_pair(
        &self,
        candidate: &CandidateId,
        posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError> {
        if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(None);
        }
        self.inner.find_by_pair(candidate, posting)
    }

    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_candidate(candidate)
    }

    fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_posting(posting)
    }

    fn update_if_status(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.inner.update_if_status(expected, application)
    }
}

/// Repository where another reviewer shortlists the application just before our write lands.
#[derive(Default, Clone)]
pub(crate) struct RacingApplications {
    pub(crate) inner: MemoryApplications,
}

impl ApplicationRepository for RacingApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_pair(
        &self,
        candidate: &CandidateId,
        posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.find_by_pair(candidate, posting)
    }

    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_candidate(candidate)
    }

    fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_posting(posting)
    }

    fn update_if_status(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        if let Some(mut winner) = self.inner.fetch(&application.id)? {
            winner.status = ApplicationStatus::Shortlisted;
            self.inner.update_if_status(expected, winner)?;
        }
        self.inner.update_if_status(expected, application)
    }
}

pub(crate) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_pair(
        &self,
        _candidate: &CandidateId,
        _posting: &PostingId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_candidate(&self, _candidate: &CandidateId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_posting(&self, _posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_if_status(
        &self,
        _expected: ApplicationStatus,
        _application: Application,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(crate) type MemoryApplicationService =
    ApplicationService<MemoryApplications, MemoryCatalog, MemoryProfiles>;

/// Application service over the sample catalog with one skilled and one unskilled candidate.
pub(crate) fn build_application_service() -> (
    MemoryApplicationService,
    Arc<MemoryApplications>,
    Arc<MemoryProfiles>,
) {
    let repository = Arc::new(MemoryApplications::default());
    let catalog = Arc::new(MemoryCatalog::with(sample_catalog()));
    let profiles = Arc::new(MemoryProfiles::with(vec![
        profile("cand-1", &["react", "css"]),
        profile("cand-empty", &[]),
    ]));
    let service = ApplicationService::new(repository.clone(), catalog, profiles.clone());
    (service, repository, profiles)
}

pub(crate) fn build_opportunity_service(
    postings: Vec<JobPosting>,
    profiles: Vec<CandidateProfile>,
    config: MatchingConfig,
) -> (
    OpportunityService<MemoryCatalog, MemoryProfiles>,
    Arc<MemoryCatalog>,
    Arc<MemoryProfiles>,
) {
    let catalog = Arc::new(MemoryCatalog::with(postings));
    let profiles = Arc::new(MemoryProfiles::with(profiles));
    let service = OpportunityService::new(catalog.clone(), profiles.clone(), config);
    (service, catalog, profiles)
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
