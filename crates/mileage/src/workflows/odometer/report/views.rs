use super::super::domain::{
    Deviation, DeviationDetails, DeviationSeverity, DeviationType, VehicleId,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Compliant,
    Review,
    AtRisk,
}

impl ComplianceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::Review => "Review",
            Self::AtRisk => "At Risk",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviationCountEntry {
    pub deviation_type: DeviationType,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeverityCountEntry {
    pub severity: DeviationSeverity,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviationView {
    #[serde(rename = "type")]
    pub deviation_type: DeviationType,
    pub type_label: &'static str,
    pub severity: DeviationSeverity,
    pub severity_label: &'static str,
    pub description: String,
    pub details: DeviationDetails,
}

impl From<&Deviation> for DeviationView {
    fn from(deviation: &Deviation) -> Self {
        Self {
            deviation_type: deviation.deviation_type,
            type_label: deviation.deviation_type.label(),
            severity: deviation.severity,
            severity_label: deviation.severity.label(),
            description: deviation.description.clone(),
            details: deviation.details.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReportSummary {
    pub vehicle_id: VehicleId,
    pub compliance_score: u8,
    pub compliance_level: ComplianceLevel,
    pub compliance_level_label: &'static str,
    pub total_unaccounted_km: f64,
    pub deviation_counts: Vec<DeviationCountEntry>,
    pub severity_counts: Vec<SeverityCountEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deviations: Vec<DeviationView>,
}
