use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, Decision};
use super::lifecycle::LifecycleError;
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use crate::workflows::candidates::{CandidateId, ProfileRepository};
use crate::workflows::catalog::{CatalogRepository, PostingId, RecruiterId};
use crate::workflows::store::RepositoryError;

type SharedService<R, C, P> = Arc<ApplicationService<R, C, P>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) candidate_id: CandidateId,
    pub(crate) posting_id: PostingId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) status: Decision,
    pub(crate) recruiter_id: RecruiterId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecruiterQuery {
    pub(crate) recruiter_id: String,
}

/// Router builder exposing HTTP endpoints for submitting and deciding applications.
pub fn application_router<R, C, P>(service: SharedService<R, C, P>) -> Router
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R, C, P>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, C, P>).patch(decide_handler::<R, C, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/applications",
            get(candidate_applications_handler::<R, C, P>),
        )
        .route(
            "/api/v1/postings/:posting_id/applications",
            get(applicants_handler::<R, C, P>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, C, P>(
    State(service): State<SharedService<R, C, P>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.submit(request.candidate_id, request.posting_id) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, C, P>(
    State(service): State<SharedService<R, C, P>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<R, C, P>(
    State(service): State<SharedService<R, C, P>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.decide(&id, request.status, &request.recruiter_id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_applications_handler<R, C, P>(
    State(service): State<SharedService<R, C, P>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.for_candidate(&CandidateId(candidate_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applicants_handler<R, C, P>(
    State(service): State<SharedService<R, C, P>>,
    Path(posting_id): Path<String>,
    Query(query): Query<RecruiterQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    let recruiter = RecruiterId(query.recruiter_id);
    match service.applicants(&PostingId(posting_id), &recruiter) {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let (status, kind) = match &error {
        ApplicationServiceError::Lifecycle(LifecycleError::InvalidTransition { .. }) => {
            (StatusCode::CONFLICT, "invalid_transition")
        }
        ApplicationServiceError::Lifecycle(LifecycleError::DuplicateApplication { .. })
        | ApplicationServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "duplicate_application")
        }
        ApplicationServiceError::Ineligible(_) => (StatusCode::FORBIDDEN, "ineligible"),
        ApplicationServiceError::NotPostingOwner { .. } => {
            (StatusCode::FORBIDDEN, "not_posting_owner")
        }
        ApplicationServiceError::UnknownPosting { .. }
        | ApplicationServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        ApplicationServiceError::Repository(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
