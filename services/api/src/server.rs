use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFilingRepository};
use crate::routes::with_filing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nonresident_filing::config::AppConfig;
use nonresident_filing::error::AppError;
use nonresident_filing::filing::FilingService;
use nonresident_filing::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let repository = Arc::new(InMemoryFilingRepository::default());
    let filing_service = Arc::new(FilingService::new(repository, &config.filing));

    let app = with_filing_routes(filing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        eea_tax_bp = config.filing.rates.eea_tax_bp,
        other_tax_bp = config.filing.rates.other_tax_bp,
        "non-resident filing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
