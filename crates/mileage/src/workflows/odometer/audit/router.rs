use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::VehicleId;
use super::repository::{NotificationPublisher, SourceError, TripRecordSource};
use super::service::{AuditServiceError, VehicleAuditService};

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub trip_distance_km: Option<f64>,
}

/// Router builder exposing per-vehicle audit and estimate endpoints.
pub fn audit_router<S, N>(service: Arc<VehicleAuditService<S, N>>) -> Router
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/vehicles/:vehicle_id/audit",
            post(audit_handler::<S, N>),
        )
        .route(
            "/api/v1/vehicles/:vehicle_id/estimate",
            post(estimate_handler::<S, N>),
        )
        .route("/api/v1/fleet/audit", get(fleet_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn audit_handler<S, N>(
    State(service): State<Arc<VehicleAuditService<S, N>>>,
    Path(vehicle_id): Path<String>,
) -> Response
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    let vehicle_id = VehicleId(vehicle_id);
    match service.audit(&vehicle_id) {
        Ok(report) => (StatusCode::OK, axum::Json(report.summary())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn estimate_handler<S, N>(
    State(service): State<Arc<VehicleAuditService<S, N>>>,
    Path(vehicle_id): Path<String>,
    axum::Json(request): axum::Json<EstimateRequest>,
) -> Response
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    let vehicle_id = VehicleId(vehicle_id);
    match service.estimate(&vehicle_id, request.timestamp, request.trip_distance_km) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fleet_handler<S, N>(
    State(service): State<Arc<VehicleAuditService<S, N>>>,
) -> Response
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    match service.audit_fleet() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AuditServiceError) -> Response {
    let status = match &error {
        AuditServiceError::Source(SourceError::NotFound(_)) => StatusCode::NOT_FOUND,
        AuditServiceError::Estimate(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuditServiceError::Source(SourceError::Unavailable(_))
        | AuditServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
