use crate::infra::{format_timestamp, load_trip_log, parse_timestamp, InMemoryNotificationPublisher};
use chrono::Utc;
use clap::Args;
use mileage::config::AppConfig;
use mileage::error::AppError;
use mileage::workflows::odometer::audit::{
    ComplianceNotification, FleetAuditEntry, FleetAuditOutcome, NotificationPolicy,
    VehicleAuditService,
};
use mileage::workflows::odometer::report::views::ComplianceReportSummary;
use mileage::workflows::odometer::{InterpolationResult, TripRecord, VehicleId};
use mileage::workflows::triplog::TripLog;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const DAY_MS: i64 = 86_400_000;

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Trip-log CSV export to audit
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only audit this vehicle
    #[arg(long)]
    pub(crate) vehicle: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Trip-log CSV export holding the vehicle's readings
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Vehicle to estimate for
    #[arg(long)]
    pub(crate) vehicle: String,
    /// Point in time (epoch ms, RFC 3339 or YYYY-MM-DD[ HH:MM:SS])
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) at: i64,
    /// Planned trip distance; adds an end odometer to the estimate
    #[arg(long)]
    pub(crate) distance_km: Option<f64>,
    /// Print the estimate as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Start of the synthetic history. Defaults to 30 days ago.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) start: Option<i64>,
    /// Print reports as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let AuditArgs { csv, vehicle, json } = args;

    let config = AppConfig::load()?;
    let trip_log = load_trip_log(Some(csv.as_path()))?;
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = VehicleAuditService::new(
        Arc::new(trip_log),
        notifications.clone(),
        NotificationPolicy::from(&config.audit),
    );

    match vehicle {
        Some(vehicle) => {
            let summary = service.audit(&VehicleId(vehicle))?.summary();
            if json {
                print_json(&summary);
            } else {
                render_summary(&summary);
            }
        }
        None => {
            let entries = service.audit_fleet()?;
            if json {
                print_json(&entries);
            } else {
                render_fleet(&entries);
            }
        }
    }

    if !json {
        render_notifications(&notifications.events());
    }
    Ok(())
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        csv,
        vehicle,
        at,
        distance_km,
        json,
    } = args;

    let trip_log = load_trip_log(Some(csv.as_path()))?;
    let service = VehicleAuditService::new(
        Arc::new(trip_log),
        Arc::new(InMemoryNotificationPublisher::default()),
        NotificationPolicy::default(),
    );

    let vehicle_id = VehicleId(vehicle);
    let result = service.estimate(&vehicle_id, at, distance_km)?;
    if json {
        print_json(&result);
    } else {
        render_estimate(&vehicle_id, at, &result);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { start, json } = args;
    let start = start.unwrap_or_else(|| Utc::now().timestamp_millis() - 30 * DAY_MS);

    println!("Mileage compliance demo");
    println!("History starts {}", format_timestamp(start));

    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = VehicleAuditService::new(
        Arc::new(synthetic_fleet(start)?),
        notifications.clone(),
        NotificationPolicy::default(),
    );

    let entries = service.audit_fleet()?;
    if json {
        print_json(&entries);
    } else {
        render_fleet(&entries);
    }

    let vehicle_id = VehicleId::from("NL-CLEAN-01");
    let at = start + 3 * DAY_MS;
    println!();
    match service.estimate(&vehicle_id, at, Some(25.0)) {
        Ok(result) if json => print_json(&result),
        Ok(result) => render_estimate(&vehicle_id, at, &result),
        Err(err) => println!("Estimate unavailable: {}", err),
    }

    render_notifications(&notifications.events());
    Ok(())
}

/// Three vehicles: a clean log, one with unlogged kilometers and a long
/// silence, and one whose odometer was wound back.
fn synthetic_fleet(start: i64) -> Result<TripLog, AppError> {
    let day = |n: i64| start + n * DAY_MS;
    let mut log = TripLog::new();

    let clean = VehicleId::from("NL-CLEAN-01");
    for record in [
        TripRecord::reading("r-1", day(0), 48_200.0),
        TripRecord::trip("t-1", day(1), Some(48_200.0), Some(48_262.0), Some(62.0)),
        TripRecord::trip("t-2", day(2), Some(48_262.0), Some(48_301.0), Some(39.0)),
        TripRecord::reading("r-2", day(4), 48_301.0),
    ] {
        log.insert(clean.clone(), record)?;
    }

    let gaps = VehicleId::from("NL-GAPS-02");
    for record in [
        TripRecord::trip("t-1", day(0), Some(21_000.0), Some(21_120.0), Some(95.0)),
        TripRecord::trip("t-2", day(1), Some(21_120.0), Some(21_180.0), Some(60.0)),
        TripRecord::trip("t-3", day(20), Some(21_420.0), Some(21_470.0), Some(50.0)),
    ] {
        log.insert(gaps.clone(), record)?;
    }

    let rollback = VehicleId::from("NL-ROLLBACK-03");
    for record in [
        TripRecord::trip("t-1", day(0), Some(90_000.0), Some(90_080.0), Some(80.0)),
        TripRecord::trip("t-2", day(1), Some(89_500.0), Some(89_540.0), Some(40.0)),
    ] {
        log.insert(rollback.clone(), record)?;
    }

    Ok(log)
}

fn render_fleet(entries: &[FleetAuditEntry]) {
    println!("\nFleet audit ({} vehicles)", entries.len());
    for entry in entries {
        match &entry.outcome {
            FleetAuditOutcome::Audited(summary) => render_summary(summary),
            FleetAuditOutcome::Failed { error } => {
                println!("- {}: audit failed ({})", entry.vehicle_id, error)
            }
        }
    }
}

fn render_summary(summary: &ComplianceReportSummary) {
    println!(
        "- {}: score {} ({}) | {:.0} km unaccounted",
        summary.vehicle_id,
        summary.compliance_score,
        summary.compliance_level_label,
        summary.total_unaccounted_km
    );

    let counts: Vec<String> = summary
        .deviation_counts
        .iter()
        .filter(|entry| entry.count > 0)
        .map(|entry| format!("{} {}", entry.label, entry.count))
        .collect();
    if counts.is_empty() {
        println!("  No deviations");
        return;
    }
    println!("  {}", counts.join(" | "));

    for deviation in &summary.deviations {
        println!(
            "    - [{}] {}: {}",
            deviation.severity_label, deviation.type_label, deviation.description
        );
    }
}

fn render_estimate(vehicle_id: &VehicleId, at: i64, result: &InterpolationResult) {
    println!(
        "Odometer estimate for {} at {}: {:.0} km",
        vehicle_id,
        format_timestamp(at),
        result.start_odometer_km
    );
    if let Some(end) = result.end_odometer_km {
        println!("  Expected end odometer: {:.0} km", end);
    }

    let previous = &result.calculated_from.previous;
    println!(
        "  Based on {} ({:.0} km, {})",
        previous.id,
        previous.odometer_km,
        format_timestamp(previous.timestamp)
    );
    match &result.calculated_from.next {
        Some(next) => println!(
            "  Interpolated towards {} ({:.0} km, {})",
            next.id,
            next.odometer_km,
            format_timestamp(next.timestamp)
        ),
        None => println!("  No later reading; carried forward"),
    }
}

fn render_notifications(events: &[ComplianceNotification]) {
    if events.is_empty() {
        println!("\nCompliance notifications: none dispatched");
        return;
    }

    println!("\nCompliance notifications:");
    for event in events {
        println!(
            "  - template={} -> {} (score {}, {:.0} km unaccounted)",
            event.template, event.vehicle_id, event.compliance_score, event.total_unaccounted_km
        );
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("JSON output unavailable: {}", err),
    }
}
