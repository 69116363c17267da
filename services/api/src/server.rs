use crate::cli::ServeArgs;
use crate::infra::{AppState, FilesystemPhotoStore, TextReportRenderer};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use officehub::applications::ApplicationService;
use officehub::auth::AdminGate;
use officehub::config::AppConfig;
use officehub::error::AppError;
use officehub::identity::{bootstrap_admin, IdentityService};
use officehub::offices::OfficeService;
use officehub::reporting::ReportService;
use officehub::store::MemoryStore;
use officehub::telemetry;
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

    std::fs::create_dir_all(&config.storage.photos_dir)?;

    let store = Arc::new(MemoryStore::default());
    let admin = bootstrap_admin(store.as_ref(), &config.admin)?;
    let gate = Arc::new(AdminGate::new(admin.token));

    let photo_store = Arc::new(FilesystemPhotoStore::new(config.storage.photos_dir.clone()));
    let renderer = Arc::new(TextReportRenderer);

    let identity = Arc::new(IdentityService::new(store.clone(), gate.clone()));
    let offices = Arc::new(OfficeService::new(store.clone(), photo_store, gate.clone()));
    let applications = Arc::new(ApplicationService::new(store.clone(), gate.clone()));
    let report = Arc::new(ReportService::new(store, renderer, gate));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        photos_dir: config.storage.photos_dir.clone(),
    };

    let app = app_router(identity, offices, applications, report)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "office rental backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
