use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{TripRecord, VehicleId};

/// Supplies a consistent snapshot of a vehicle's records.
pub trait TripRecordSource: Send + Sync {
    fn vehicles(&self) -> Result<Vec<VehicleId>, SourceError>;
    fn records_for(&self, vehicle_id: &VehicleId) -> Result<Vec<TripRecord>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("vehicle {0} not found")]
    NotFound(VehicleId),
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for compliance notifications (e-mail, webhook, push adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: ComplianceNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceNotification {
    pub template: String,
    pub vehicle_id: VehicleId,
    pub compliance_score: u8,
    pub total_unaccounted_km: f64,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
