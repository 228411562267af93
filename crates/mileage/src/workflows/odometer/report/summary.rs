use super::super::deviations::analyze_vehicle;
use super::super::domain::{Deviation, DeviationSeverity, DeviationType, TripRecord, VehicleId};
use super::super::scoring::compliance_score;
use super::views::{
    ComplianceLevel, ComplianceReportSummary, DeviationCountEntry, DeviationView,
    SeverityCountEntry,
};
use serde::Serialize;

const COMPLIANT_MIN_SCORE: u8 = 80;
const REVIEW_MIN_SCORE: u8 = 50;

/// Audit outcome for one vehicle, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub vehicle_id: VehicleId,
    pub deviations: Vec<Deviation>,
    pub total_unaccounted_km: f64,
    pub compliance_score: u8,
}

impl ComplianceReport {
    pub fn audit(vehicle_id: VehicleId, records: &[TripRecord]) -> Self {
        let analysis = analyze_vehicle(records);
        let compliance_score =
            compliance_score(&analysis.deviations, analysis.total_unaccounted_km);

        Self {
            vehicle_id,
            deviations: analysis.deviations,
            total_unaccounted_km: analysis.total_unaccounted_km,
            compliance_score,
        }
    }

    pub fn count_of(&self, deviation_type: DeviationType) -> usize {
        self.deviations
            .iter()
            .filter(|deviation| deviation.deviation_type == deviation_type)
            .count()
    }

    pub fn level(&self) -> ComplianceLevel {
        let has_high = self
            .deviations
            .iter()
            .any(|deviation| deviation.severity == DeviationSeverity::High);

        if self.compliance_score >= COMPLIANT_MIN_SCORE && !has_high {
            ComplianceLevel::Compliant
        } else if self.compliance_score >= REVIEW_MIN_SCORE {
            ComplianceLevel::Review
        } else {
            ComplianceLevel::AtRisk
        }
    }

    pub fn summary(&self) -> ComplianceReportSummary {
        let deviation_counts = DeviationType::ordered()
            .into_iter()
            .map(|deviation_type| DeviationCountEntry {
                deviation_type,
                label: deviation_type.label(),
                count: self.count_of(deviation_type),
            })
            .collect();

        let severity_counts = DeviationSeverity::ordered()
            .into_iter()
            .map(|severity| SeverityCountEntry {
                severity,
                label: severity.label(),
                count: self
                    .deviations
                    .iter()
                    .filter(|deviation| deviation.severity == severity)
                    .count(),
            })
            .collect();

        let level = self.level();

        ComplianceReportSummary {
            vehicle_id: self.vehicle_id.clone(),
            compliance_score: self.compliance_score,
            compliance_level: level,
            compliance_level_label: level.label(),
            total_unaccounted_km: self.total_unaccounted_km,
            deviation_counts,
            severity_counts,
            deviations: self.deviations.iter().map(DeviationView::from).collect(),
        }
    }
}
