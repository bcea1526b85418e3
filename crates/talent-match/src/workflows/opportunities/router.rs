use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{OpportunityError, OpportunityService};
use crate::workflows::candidates::{CandidateId, ProfileRepository};
use crate::workflows::catalog::{CatalogRepository, PostingDraft, PostingId};
use crate::workflows::matching::{SkillInput, ZeroScorePolicy};
use crate::workflows::store::RepositoryError;

type SharedService<C, P> = Arc<OpportunityService<C, P>>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankedQuery {
    pub(crate) candidate: Option<String>,
    pub(crate) zero_score: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillUpload {
    pub(crate) skills: SkillInput,
}

/// Router builder for the candidate-facing catalog and profile endpoints.
pub fn opportunity_router<C, P>(service: SharedService<C, P>) -> Router
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/postings", post(create_posting_handler::<C, P>))
        .route("/api/v1/postings/ranked", get(ranked_handler::<C, P>))
        .route("/api/v1/postings/:posting_id", get(posting_handler::<C, P>))
        .route(
            "/api/v1/candidates/:candidate_id",
            get(profile_handler::<C, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/skills",
            put(upload_skills_handler::<C, P>),
        )
        .with_state(service)
}

pub(crate) async fn ranked_handler<C, P>(
    State(service): State<SharedService<C, P>>,
    Query(query): Query<RankedQuery>,
) -> Response
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    let policy = match query.zero_score.as_deref().map(str::parse::<ZeroScorePolicy>) {
        Some(Ok(policy)) => Some(policy),
        Some(Err(err)) => {
            let payload = json!({ "error": err.to_string(), "kind": "invalid_query" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
        None => None,
    };

    let candidate = query
        .candidate
        .filter(|id| !id.trim().is_empty())
        .map(CandidateId);

    match service.ranked_for(candidate.as_ref(), policy) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_posting_handler<C, P>(
    State(service): State<SharedService<C, P>>,
    axum::Json(draft): axum::Json<PostingDraft>,
) -> Response
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.create_posting(draft) {
        Ok(posting) => (StatusCode::CREATED, axum::Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn posting_handler<C, P>(
    State(service): State<SharedService<C, P>>,
    Path(posting_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.posting(&PostingId(posting_id)) {
        Ok(posting) => (StatusCode::OK, axum::Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<C, P>(
    State(service): State<SharedService<C, P>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.profile(&CandidateId(candidate_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_skills_handler<C, P>(
    State(service): State<SharedService<C, P>>,
    Path(candidate_id): Path<String>,
    axum::Json(upload): axum::Json<SkillUpload>,
) -> Response
where
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.upload_skills(CandidateId(candidate_id), &upload.skills) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OpportunityError) -> Response {
    let (status, kind) = match &error {
        OpportunityError::Catalog(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_posting"),
        OpportunityError::PostingNotFound { .. }
        | OpportunityError::CandidateNotFound { .. }
        | OpportunityError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        OpportunityError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "duplicate_posting")
        }
        OpportunityError::Repository(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
