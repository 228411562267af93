use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::odometer::audit::repository::{
    ComplianceNotification, NotificationError, NotificationPublisher, SourceError,
    TripRecordSource,
};
use crate::workflows::odometer::audit::{
    audit_router, NotificationPolicy, VehicleAuditService,
};
use crate::workflows::odometer::domain::{TripRecord, VehicleId};

pub(super) const DAY_MS: i64 = 86_400_000;

pub(super) fn clean_vehicle() -> VehicleId {
    VehicleId::from("NL-CLEAN")
}

pub(super) fn drifting_vehicle() -> VehicleId {
    VehicleId::from("NL-DRIFT")
}

pub(super) fn clean_records() -> Vec<TripRecord> {
    vec![
        TripRecord::reading("r-1", 0, 1000.0),
        TripRecord::trip("t-1", DAY_MS, Some(1000.0), Some(1040.0), Some(40.0)),
        TripRecord::trip("t-2", 2 * DAY_MS, Some(1040.0), Some(1100.0), Some(60.0)),
        TripRecord::reading("r-2", 3 * DAY_MS, 1100.0),
    ]
}

/// Two silent months with 400 km of unlogged driving, then a rollback.
pub(super) fn drifting_records() -> Vec<TripRecord> {
    vec![
        TripRecord::reading("r-1", 0, 5000.0),
        TripRecord::trip("t-1", DAY_MS, Some(5000.0), Some(5050.0), Some(50.0)),
        TripRecord::trip("t-2", 61 * DAY_MS, Some(5450.0), Some(5500.0), Some(50.0)),
        TripRecord::trip("t-3", 62 * DAY_MS, Some(5480.0), Some(5520.0), Some(40.0)),
    ]
}

pub(super) fn policy() -> NotificationPolicy {
    NotificationPolicy::default()
}

pub(super) fn build_service() -> (
    VehicleAuditService<MemorySource, MemoryNotifications>,
    Arc<MemorySource>,
    Arc<MemoryNotifications>,
) {
    let source = Arc::new(MemorySource::seeded());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = VehicleAuditService::new(source.clone(), notifications.clone(), policy());
    (service, source, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    pub(super) records: Arc<Mutex<BTreeMap<VehicleId, Vec<TripRecord>>>>,
}

impl MemorySource {
    pub(super) fn seeded() -> Self {
        let source = Self::default();
        {
            let mut guard = source.records.lock().expect("source mutex poisoned");
            guard.insert(clean_vehicle(), clean_records());
            guard.insert(drifting_vehicle(), drifting_records());
        }
        source
    }
}

impl TripRecordSource for MemorySource {
    fn vehicles(&self) -> Result<Vec<VehicleId>, SourceError> {
        let guard = self.records.lock().expect("source mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }

    fn records_for(&self, vehicle_id: &VehicleId) -> Result<Vec<TripRecord>, SourceError> {
        let guard = self.records.lock().expect("source mutex poisoned");
        guard
            .get(vehicle_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(vehicle_id.clone()))
    }
}

/// Lists a vehicle it cannot load, to exercise per-vehicle failure handling.
pub(super) struct FlakySource {
    pub(super) inner: MemorySource,
}

impl TripRecordSource for FlakySource {
    fn vehicles(&self) -> Result<Vec<VehicleId>, SourceError> {
        let mut vehicles = self.inner.vehicles()?;
        vehicles.push(VehicleId::from("NL-GHOST"));
        Ok(vehicles)
    }

    fn records_for(&self, vehicle_id: &VehicleId) -> Result<Vec<TripRecord>, SourceError> {
        if vehicle_id.0 == "NL-GHOST" {
            return Err(SourceError::Unavailable("replica lagging".to_string()));
        }
        self.inner.records_for(vehicle_id)
    }
}

pub(super) struct UnavailableSource;

impl TripRecordSource for UnavailableSource {
    fn vehicles(&self) -> Result<Vec<VehicleId>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn records_for(&self, _vehicle_id: &VehicleId) -> Result<Vec<TripRecord>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<ComplianceNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<ComplianceNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: ComplianceNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct BrokenNotifications;

impl NotificationPublisher for BrokenNotifications {
    fn publish(&self, _notification: ComplianceNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp refused".to_string()))
    }
}

pub(super) fn router_with_service(
    service: VehicleAuditService<MemorySource, MemoryNotifications>,
) -> axum::Router {
    audit_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
