use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use mileage::error::AppError;
use mileage::workflows::odometer::audit::{
    audit_router, NotificationPublisher, TripRecordSource, VehicleAuditService,
};
use mileage::workflows::odometer::report::views::ComplianceReportSummary;
use mileage::workflows::odometer::{
    estimate_from_records, ComplianceReport, InterpolationResult, VehicleId,
};
use mileage::workflows::triplog::{validate_records, TripRecordInput};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct OdometerEstimateRequest {
    pub(crate) records: Vec<TripRecordInput>,
    /// Epoch milliseconds.
    pub(crate) timestamp: i64,
    #[serde(default)]
    pub(crate) trip_distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OdometerAuditRequest {
    pub(crate) vehicle_id: VehicleId,
    pub(crate) records: Vec<TripRecordInput>,
}

pub(crate) fn with_odometer_routes<S, N>(
    service: Arc<VehicleAuditService<S, N>>,
) -> axum::Router
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    audit_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/odometer/estimate",
            axum::routing::post(odometer_estimate_endpoint),
        )
        .route(
            "/api/v1/odometer/audit",
            axum::routing::post(odometer_audit_endpoint),
        )
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

/// Estimate from a record batch supplied in the request; nothing is stored.
pub(crate) async fn odometer_estimate_endpoint(
    Json(payload): Json<OdometerEstimateRequest>,
) -> Result<Json<InterpolationResult>, AppError> {
    let OdometerEstimateRequest {
        records,
        timestamp,
        trip_distance_km,
    } = payload;

    let records = validate_records(records)?;
    let result = estimate_from_records(&records, timestamp, trip_distance_km)?;
    Ok(Json(result))
}

pub(crate) async fn odometer_audit_endpoint(
    Json(payload): Json<OdometerAuditRequest>,
) -> Result<Json<ComplianceReportSummary>, AppError> {
    let records = validate_records(payload.records)?;
    let report = ComplianceReport::audit(payload.vehicle_id, &records);
    Ok(Json(report.summary()))
}
