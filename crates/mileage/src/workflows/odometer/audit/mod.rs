//! Caller-side orchestration around the pure odometer engine: fetching a
//! vehicle's record snapshot, auditing it, and deciding whether to notify.

pub mod policy;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use policy::NotificationPolicy;
pub use repository::{
    ComplianceNotification, NotificationError, NotificationPublisher, SourceError,
    TripRecordSource,
};
pub use router::audit_router;
pub use service::{AuditServiceError, FleetAuditEntry, FleetAuditOutcome, VehicleAuditService};
