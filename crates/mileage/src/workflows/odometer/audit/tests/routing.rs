use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::odometer::audit::router::{audit_handler, estimate_handler, EstimateRequest};
use crate::workflows::odometer::audit::VehicleAuditService;

#[tokio::test]
async fn audit_route_returns_summary() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/vehicles/NL-DRIFT/audit")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["vehicle_id"], json!("NL-DRIFT"));
    assert_eq!(payload["compliance_score"], json!(50));
    assert_eq!(payload["compliance_level"], json!("review"));
    assert_eq!(payload["deviations"][0]["type"], json!("odometer_gap"));
}

#[tokio::test]
async fn audit_handler_returns_not_found_for_unknown_vehicle() {
    let (service, _, _) = build_service();

    let response = audit_handler::<MemorySource, MemoryNotifications>(
        State(Arc::new(service)),
        Path("NL-NOPE".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn audit_handler_returns_internal_error_when_source_down() {
    let service = Arc::new(VehicleAuditService::new(
        Arc::new(UnavailableSource),
        Arc::new(MemoryNotifications::default()),
        policy(),
    ));

    let response = audit_handler::<UnavailableSource, MemoryNotifications>(
        State(service),
        Path("NL-CLEAN".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn estimate_handler_rejects_missing_baseline() {
    let (service, _, _) = build_service();

    let response = estimate_handler::<MemorySource, MemoryNotifications>(
        State(Arc::new(service)),
        Path("NL-CLEAN".to_string()),
        axum::Json(EstimateRequest {
            timestamp: -DAY_MS,
            trip_distance_km: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("no baseline reading yet"));
}

#[tokio::test]
async fn estimate_route_returns_provenance() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/vehicles/NL-CLEAN/estimate")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "timestamp": 4 * DAY_MS })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["start_odometer_km"], json!(1100.0));
    assert_eq!(payload["calculated_from"]["previous"]["id"], json!("r-2"));
    assert!(payload.get("end_odometer_km").is_none());
}

#[tokio::test]
async fn fleet_route_lists_every_vehicle() {
    let (service, _, notifications) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/fleet/audit")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|entry| entry["status"] == json!("audited")));
    assert_eq!(notifications.events().len(), 1);
}
