use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::super::domain::VehicleId;
use super::super::interpolation::{InterpolationResult, OdometerError};
use super::super::report::views::ComplianceReportSummary;
use super::super::report::ComplianceReport;
use super::super::estimate_from_records;
use super::policy::NotificationPolicy;
use super::repository::{
    ComplianceNotification, NotificationError, NotificationPublisher, SourceError,
    TripRecordSource,
};

pub const DEVIATION_NOTIFICATION_TEMPLATE: &str = "compliance_deviation";

/// Service composing the record source, the audit engine, and notifications.
pub struct VehicleAuditService<S, N> {
    source: Arc<S>,
    notifications: Arc<N>,
    policy: NotificationPolicy,
}

impl<S, N> VehicleAuditService<S, N>
where
    S: TripRecordSource + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(source: Arc<S>, notifications: Arc<N>, policy: NotificationPolicy) -> Self {
        Self {
            source,
            notifications,
            policy,
        }
    }

    pub fn policy(&self) -> &NotificationPolicy {
        &self.policy
    }

    /// Audit one vehicle and notify when the policy thresholds are crossed.
    pub fn audit(&self, vehicle_id: &VehicleId) -> Result<ComplianceReport, AuditServiceError> {
        let records = self.source.records_for(vehicle_id)?;
        let report = ComplianceReport::audit(vehicle_id.clone(), &records);

        debug!(
            vehicle = %vehicle_id,
            records = records.len(),
            deviations = report.deviations.len(),
            score = report.compliance_score,
            "vehicle audited"
        );

        if self.policy.should_notify(&report) {
            self.notifications.publish(notification_for(&report))?;
            info!(
                vehicle = %vehicle_id,
                score = report.compliance_score,
                unaccounted_km = report.total_unaccounted_km,
                "compliance deviation notification dispatched"
            );
        }

        Ok(report)
    }

    /// Estimate the odometer of a vehicle at `timestamp` (epoch ms).
    pub fn estimate(
        &self,
        vehicle_id: &VehicleId,
        timestamp: i64,
        trip_distance_km: Option<f64>,
    ) -> Result<InterpolationResult, AuditServiceError> {
        let records = self.source.records_for(vehicle_id)?;
        let result = estimate_from_records(&records, timestamp, trip_distance_km)?;
        Ok(result)
    }

    /// Audit every vehicle the source knows about. A failing vehicle is
    /// recorded in its entry and does not stop the run.
    pub fn audit_fleet(&self) -> Result<Vec<FleetAuditEntry>, AuditServiceError> {
        let vehicles = self.source.vehicles()?;
        let mut entries = Vec::with_capacity(vehicles.len());

        for vehicle_id in vehicles {
            let outcome = match self.audit(&vehicle_id) {
                Ok(report) => FleetAuditOutcome::Audited(report.summary()),
                Err(error) => {
                    warn!(vehicle = %vehicle_id, %error, "vehicle audit failed");
                    FleetAuditOutcome::Failed {
                        error: error.to_string(),
                    }
                }
            };
            entries.push(FleetAuditEntry {
                vehicle_id,
                outcome,
            });
        }

        Ok(entries)
    }
}

fn notification_for(report: &ComplianceReport) -> ComplianceNotification {
    let summary = report.summary();
    let mut details = BTreeMap::new();
    details.insert(
        "compliance_level".to_string(),
        summary.compliance_level_label.to_string(),
    );
    details.insert(
        "deviation_count".to_string(),
        report.deviations.len().to_string(),
    );
    for entry in summary.deviation_counts.iter().filter(|entry| entry.count > 0) {
        details.insert(entry.label.to_string(), entry.count.to_string());
    }

    ComplianceNotification {
        template: DEVIATION_NOTIFICATION_TEMPLATE.to_string(),
        vehicle_id: report.vehicle_id.clone(),
        compliance_score: report.compliance_score,
        total_unaccounted_km: report.total_unaccounted_km,
        details,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetAuditEntry {
    pub vehicle_id: VehicleId,
    #[serde(flatten)]
    pub outcome: FleetAuditOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FleetAuditOutcome {
    Audited(ComplianceReportSummary),
    Failed { error: String },
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Estimate(#[from] OdometerError),
}
