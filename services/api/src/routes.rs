use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use talent_match::workflows::applications::{
    application_router, ApplicationRepository, ApplicationService,
};
use talent_match::workflows::candidates::ProfileRepository;
use talent_match::workflows::catalog::CatalogRepository;
use talent_match::workflows::opportunities::{opportunity_router, OpportunityService};

pub(crate) fn with_workflow_routes<R, C, P>(
    opportunities: Arc<OpportunityService<C, P>>,
    applications: Arc<ApplicationService<R, C, P>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    C: CatalogRepository + 'static,
    P: ProfileRepository + 'static,
{
    opportunity_router(opportunities)
        .merge(application_router(applications))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
