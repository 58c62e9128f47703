use crate::cli::ServeArgs;
use crate::infra::{AppState, SmtpNotificationSender, SqliteApplicantRepository};
use crate::routes::with_admission_routes;
use admission_portal::admissions::AdmissionService;
use admission_portal::config::AppConfig;
use admission_portal::error::AppError;
use admission_portal::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    // Mirrors the deployment layout: the database file lives in an
    // instance directory that may not exist on first boot.
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let repository = Arc::new(SqliteApplicantRepository::open(&config.database.path).await?);
    let notifier = Arc::new(SmtpNotificationSender::from_config(&config.mail)?);
    let admission_service = Arc::new(AdmissionService::new(repository, notifier));

    let app = with_admission_routes(admission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, database = %config.database.path.display(), "admission portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
