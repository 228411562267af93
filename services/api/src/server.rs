use crate::cli::ServeArgs;
use crate::infra::{load_trip_log, AppState, InMemoryNotificationPublisher};
use crate::routes::with_odometer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mileage::config::AppConfig;
use mileage::error::AppError;
use mileage::telemetry;
use mileage::workflows::odometer::audit::{NotificationPolicy, VehicleAuditService};
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let trip_log = load_trip_log(args.csv.as_deref())?;
    info!(
        vehicles = trip_log.vehicle_ids().len(),
        records = trip_log.len(),
        "trip log loaded"
    );

    let policy = NotificationPolicy::from(&config.audit);
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let audit_service = Arc::new(VehicleAuditService::new(
        Arc::new(trip_log),
        notifications,
        policy,
    ));

    let app = with_odometer_routes(audit_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mileage compliance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
