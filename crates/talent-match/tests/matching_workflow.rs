//! End-to-end behavior of skill matching, ranking and the application lifecycle, exercised only
//! through the public services and HTTP routers.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use talent_match::config::MatchingConfig;
    use talent_match::workflows::applications::{
        Application, ApplicationId, ApplicationRepository, ApplicationService, ApplicationStatus,
    };
    use talent_match::workflows::candidates::{CandidateId, CandidateProfile, ProfileRepository};
    use talent_match::workflows::catalog::{
        CatalogRepository, JobPosting, PostingId, RecruiterId,
    };
    use talent_match::workflows::matching::SkillSet;
    use talent_match::workflows::opportunities::OpportunityService;
    use talent_match::workflows::store::RepositoryError;

    pub(super) fn posting(id: &str, title: &str, recruiter: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            id: PostingId(id.to_string()),
            title: title.to_string(),
            organization: "Acme".to_string(),
            description: String::new(),
            recruiter_id: RecruiterId(recruiter.to_string()),
            required_skills: SkillSet::from_tokens(skills),
        }
    }

    pub(super) fn catalog() -> Vec<JobPosting> {
        vec![
            posting("1", "Frontend Developer", "rec-a", &["react", "javascript", "css"]),
            posting("2", "Backend Developer", "rec-a", &["node", "express", "mongodb"]),
            posting("3", "Full Stack Engineer", "rec-b", &["react", "node", "sql"]),
        ]
    }

    #[derive(Default)]
    pub(super) struct Catalog(Mutex<Vec<JobPosting>>);

    impl CatalogRepository for Catalog {
        fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
            let mut guard = self.0.lock().expect("lock");
            if guard.iter().any(|existing| existing.id == posting.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.push(posting.clone());
            Ok(posting)
        }

        fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("lock")
                .iter()
                .find(|posting| &posting.id == id)
                .cloned())
        }

        fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
            Ok(self.0.lock().expect("lock").clone())
        }
    }

    #[derive(Default)]
    pub(super) struct Profiles(Mutex<HashMap<CandidateId, CandidateProfile>>);

    impl ProfileRepository for Profiles {
        fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
            Ok(self.0.lock().expect("lock").get(id).cloned())
        }

        fn upsert(&self, profile: CandidateProfile) -> Result<CandidateProfile, RepositoryError> {
            self.0
                .lock()
                .expect("lock")
                .insert(profile.id.clone(), profile.clone());
            Ok(profile)
        }
    }

    #[derive(Default)]
    pub(super) struct Applications(Mutex<HashMap<ApplicationId, Application>>);

    impl ApplicationRepository for Applications {
        fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
            let mut guard = self.0.lock().expect("lock");
            if guard
                .values()
                .any(|existing| existing.is_for(&application.candidate_id, &application.posting_id))
            {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(application.id.clone(), application.clone());
            Ok(application)
        }

        fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
            Ok(self.0.lock().expect("lock").get(id).cloned())
        }

        fn find_by_pair(
            &self,
            candidate: &CandidateId,
            posting: &PostingId,
        ) -> Result<Option<Application>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("lock")
                .values()
                .find(|application| application.is_for(candidate, posting))
                .cloned())
        }

        fn for_candidate(
            &self,
            candidate: &CandidateId,
        ) -> Result<Vec<Application>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("lock")
                .values()
                .filter(|application| &application.candidate_id == candidate)
                .cloned()
                .collect())
        }

        fn for_posting(&self, posting: &PostingId) -> Result<Vec<Application>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .expect("lock")
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
            let mut guard = self.0.lock().expect("lock");
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

    pub(super) struct Harness {
        pub(super) opportunities: Arc<OpportunityService<Catalog, Profiles>>,
        pub(super) applications: Arc<ApplicationService<Applications, Catalog, Profiles>>,
    }

    pub(super) fn harness() -> Harness {
        let postings = Arc::new(Catalog::default());
        for posting in catalog() {
            postings.insert(posting).expect("seed posting");
        }
        let profiles = Arc::new(Profiles::default());
        let opportunities = Arc::new(OpportunityService::new(
            postings.clone(),
            profiles.clone(),
            MatchingConfig::default(),
        ));
        let applications = Arc::new(ApplicationService::new(
            Arc::new(Applications::default()),
            postings,
            profiles,
        ));
        Harness {
            opportunities,
            applications,
        }
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{catalog, harness, posting};
use talent_match::workflows::applications::{
    application_router, ApplicationServiceError, ApplicationStatus, Decision, LifecycleError,
};
use talent_match::workflows::candidates::CandidateId;
use talent_match::workflows::catalog::{PostingId, RecruiterId};
use talent_match::workflows::matching::{
    can_apply, normalize, rank, score, SkillInput, SkillSet, ZeroScorePolicy,
};
use talent_match::workflows::opportunities::opportunity_router;

fn skills(raw: &str) -> SkillSet {
    normalize(&SkillInput::Text(raw.to_string()), ',')
}

#[test]
fn raw_skill_text_is_canonicalized() {
    let set = skills(" React , react,CSS,, ");
    assert_eq!(set.as_slice(), ["react", "css"]);
    assert!(normalize(&SkillInput::Text(" , ,".to_string()), ',').is_empty());
}

#[test]
fn partial_overlap_reports_matched_and_missing_in_required_order() {
    let result = score(&skills("react, css"), &skills("react, javascript, css"));
    assert_eq!(result.score, 67);
    assert_eq!(result.matched_skills, ["react", "css"]);
    assert_eq!(result.missing_skills, ["javascript"]);
}

#[test]
fn empty_candidate_scores_zero_everywhere_and_cannot_apply() {
    let postings = catalog();
    let candidate = SkillSet::new();
    let ranked = rank(&candidate, &postings, ZeroScorePolicy::Include);

    assert_eq!(ranked.len(), 3);
    for entry in &ranked {
        assert_eq!(entry.result.score, 0);
        assert!(entry.result.matched_skills.is_empty());
        assert_eq!(
            entry.result.missing_skills.len(),
            entry.posting.required_skills.len()
        );
    }
    assert!(!can_apply(&candidate));
}

#[test]
fn ranking_orders_by_score_and_policy_controls_zero_scores() {
    let postings = vec![
        posting("a", "A", "r", &["x", "y"]),
        posting("b", "B", "r", &["x"]),
        posting("c", "C", "r", &["z"]),
    ];
    let candidate = skills("x");

    let included = rank(&candidate, &postings, ZeroScorePolicy::Include);
    let order: Vec<&str> = included.iter().map(|e| e.posting.id.0.as_str()).collect();
    assert_eq!(order, ["b", "a", "c"]);
    assert_eq!(
        included.iter().map(|e| e.result.score).collect::<Vec<_>>(),
        [100, 50, 0]
    );

    let excluded = rank(&candidate, &postings, ZeroScorePolicy::Exclude);
    assert_eq!(excluded.len(), 2);
    assert_eq!(postings.len(), 3);
}

#[test]
fn ranking_is_deterministic_for_equal_scores() {
    let postings = catalog();
    let candidate = skills("react");
    let first: Vec<PostingId> = rank(&candidate, &postings, ZeroScorePolicy::Include)
        .into_iter()
        .map(|entry| entry.posting.id.clone())
        .collect();
    let second: Vec<PostingId> = rank(&candidate, &postings, ZeroScorePolicy::Include)
        .into_iter()
        .map(|entry| entry.posting.id.clone())
        .collect();
    assert_eq!(first, second);
    assert_eq!(first[0], PostingId("1".to_string()));
    assert_eq!(first[1], PostingId("3".to_string()));
}

#[test]
fn application_lifecycle_through_services() {
    let harness = harness();
    let candidate = CandidateId("cand-1".to_string());
    let frontend = PostingId("1".to_string());

    assert!(matches!(
        harness
            .applications
            .submit(candidate.clone(), frontend.clone()),
        Err(ApplicationServiceError::Ineligible(_))
    ));

    harness
        .opportunities
        .upload_skills(candidate.clone(), &SkillInput::Text("React, CSS".to_string()))
        .expect("upload");
    let ranked = harness
        .opportunities
        .ranked_for(Some(&candidate), None)
        .expect("ranked");
    assert!(ranked.can_apply);
    assert_eq!(ranked.postings[0].posting.id, frontend);

    let application = harness
        .applications
        .submit(candidate.clone(), frontend.clone())
        .expect("submits");
    assert_eq!(application.status, ApplicationStatus::Pending);

    match harness.applications.submit(candidate.clone(), frontend) {
        Err(ApplicationServiceError::Lifecycle(LifecycleError::DuplicateApplication {
            existing,
            ..
        })) => assert_eq!(existing, application.id),
        other => panic!("expected duplicate, got {other:?}"),
    }

    let owner = RecruiterId("rec-a".to_string());
    let shortlisted = harness
        .applications
        .decide(&application.id, Decision::Shortlisted, &owner)
        .expect("owner shortlists");
    assert_eq!(shortlisted.status, ApplicationStatus::Shortlisted);

    assert!(matches!(
        harness
            .applications
            .decide(&application.id, Decision::Rejected, &owner),
        Err(ApplicationServiceError::Lifecycle(
            LifecycleError::InvalidTransition { .. }
        ))
    ));
    assert_eq!(
        harness
            .applications
            .get(&application.id)
            .expect("stored")
            .status,
        ApplicationStatus::Shortlisted
    );
}

async fn call(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("dispatch");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn http_surface_covers_upload_rank_apply_and_review() {
    let harness = harness();
    let router = opportunity_router(Arc::clone(&harness.opportunities))
        .merge(application_router(Arc::clone(&harness.applications)));

    let (status, _) = call(
        &router,
        "PUT",
        "/api/v1/candidates/cand-7/skills",
        Some(json!({ "skills": ["Node", "SQL"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, ranked) = call(
        &router,
        "GET",
        "/api/v1/postings/ranked?candidate=cand-7&zero_score=exclude",
        None,
    )
    .await;
    let ids: Vec<&str> = ranked["postings"]
        .as_array()
        .expect("postings")
        .iter()
        .filter_map(|entry| entry["posting"]["id"].as_str())
        .collect();
    assert_eq!(ids, ["3", "2"]);
    assert_eq!(ranked["postings"][0]["score"], 67);

    let (status, created) = call(
        &router,
        "POST",
        "/api/v1/applications",
        Some(json!({ "candidate_id": "cand-7", "posting_id": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/applications/{}", created["id"].as_str().expect("id"));

    let (status, _) = call(
        &router,
        "PATCH",
        &uri,
        Some(json!({ "status": "rejected", "recruiter_id": "rec-a" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, decided) = call(
        &router,
        "PATCH",
        &uri,
        Some(json!({ "status": "rejected", "recruiter_id": "rec-b" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["status"], "rejected");

    let (_, mine) = call(&router, "GET", "/api/v1/candidates/cand-7/applications", None).await;
    assert_eq!(mine[0]["status"], "rejected");
    assert_eq!(mine[0]["posting_title"], "Full Stack Engineer");
}
