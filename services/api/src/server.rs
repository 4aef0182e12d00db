use crate::cli::ServeArgs;
use crate::infra::{demo_catalog, demo_repositories, AppState};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ftpr_intake::config::AppConfig;
use ftpr_intake::error::AppError;
use ftpr_intake::telemetry;
use ftpr_intake::workflows::ftpr::{
    CatalogImporter, FtprIntakeService, PropertyCatalog, SubsidyType,
};
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

    let catalog: Arc<dyn PropertyCatalog> = match args.catalog.take() {
        Some(path) => {
            let catalog = CatalogImporter::from_path(&path, SubsidyType::standard_catalog())?;
            info!(
                path = %path.display(),
                tenants = catalog.tenant_count(),
                properties = catalog.property_count(),
                "tenant roster imported"
            );
            Arc::new(catalog)
        }
        None => Arc::new(demo_catalog()),
    };
    let (accounts, cases) = demo_repositories();
    let intake_service = Arc::new(FtprIntakeService::new(
        Arc::new(accounts),
        Arc::new(cases),
        catalog,
        config.intake.clone(),
    ));

    let app = with_intake_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ftpr intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
