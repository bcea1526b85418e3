use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, AppState, InMemoryApplicationRepository, InMemoryCatalogRepository,
    InMemoryProfileRepository,
};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_match::config::AppConfig;
use talent_match::error::AppError;
use talent_match::telemetry;
use talent_match::workflows::applications::ApplicationService;
use talent_match::workflows::opportunities::OpportunityService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(InMemoryCatalogRepository::seeded(load_catalog(&config)?)?);
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());

    let opportunity_service = Arc::new(OpportunityService::new(
        catalog.clone(),
        profiles.clone(),
        config.matching,
    ));
    let application_service = Arc::new(ApplicationService::new(applications, catalog, profiles));

    let app = with_workflow_routes(opportunity_service, application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        zero_score_policy = %config.matching.zero_score_policy,
        "talent match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
