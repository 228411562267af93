use super::super::report::ComplianceReport;
use crate::config::AuditConfig;

const DEFAULT_SCORE_BELOW: u8 = 80;
const DEFAULT_UNACCOUNTED_KM_ABOVE: f64 = 100.0;

/// Thresholds deciding when an audit warrants a compliance notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPolicy {
    score_below: u8,
    unaccounted_km_above: f64,
}

impl NotificationPolicy {
    pub fn new(score_below: u8, unaccounted_km_above: f64) -> Self {
        let unaccounted_km_above = if unaccounted_km_above.is_finite() && unaccounted_km_above >= 0.0
        {
            unaccounted_km_above
        } else {
            DEFAULT_UNACCOUNTED_KM_ABOVE
        };

        Self {
            score_below: score_below.min(100),
            unaccounted_km_above,
        }
    }

    pub fn score_below(&self) -> u8 {
        self.score_below
    }

    pub fn unaccounted_km_above(&self) -> f64 {
        self.unaccounted_km_above
    }

    pub fn should_notify(&self, report: &ComplianceReport) -> bool {
        report.compliance_score < self.score_below
            || report.total_unaccounted_km > self.unaccounted_km_above
    }
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_BELOW, DEFAULT_UNACCOUNTED_KM_ABOVE)
    }
}

impl From<&AuditConfig> for NotificationPolicy {
    fn from(config: &AuditConfig) -> Self {
        Self::new(config.notify_score_below, config.notify_unaccounted_km_above)
    }
}
