use chrono::DateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use mileage::error::AppError;
use mileage::workflows::odometer::audit::{
    ComplianceNotification, NotificationError, NotificationPublisher,
};
use mileage::workflows::triplog::{parse_timestamp_ms, TripLog, TripLogImporter};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps dispatched notifications in memory; delivery adapters plug in here.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<ComplianceNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: ComplianceNotification) -> Result<(), NotificationError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("notification store poisoned".to_string()))?;
        info!(
            template = %notification.template,
            vehicle = %notification.vehicle_id,
            score = notification.compliance_score,
            "compliance notification queued"
        );
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<ComplianceNotification> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Import a trip-log CSV, or start from an empty log when no path is given.
pub(crate) fn load_trip_log(path: Option<&Path>) -> Result<TripLog, AppError> {
    match path {
        Some(path) => Ok(TripLogImporter::from_path(path)?),
        None => Ok(TripLog::new()),
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<i64, String> {
    parse_timestamp_ms(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as epoch milliseconds, RFC 3339 or YYYY-MM-DD[ HH:MM:SS]")
    })
}

pub(crate) fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
