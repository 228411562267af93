//! Odometer reconciliation and compliance auditing for a single vehicle.
//!
//! Every function here is a pure computation over the record slice it is
//! given. Fetching records, persisting results and notifying people belong to
//! the `audit` service layer and its collaborators.

pub mod audit;
pub mod deviations;
pub mod domain;
pub mod interpolation;
pub mod readings;
pub mod report;
pub mod scoring;

pub use deviations::{analyze_vehicle, VehicleAnalysis};
pub use domain::{
    Deviation, DeviationDetails, DeviationSeverity, DeviationType, OdometerReading, RecordId,
    RecordKind, TripRecord, VehicleId,
};
pub use interpolation::{estimate_odometer, CalculatedFrom, InterpolationResult, OdometerError};
pub use readings::extract_readings;
pub use report::ComplianceReport;
pub use scoring::compliance_score;

/// Extract readings from a full record stream and estimate the odometer.
pub fn estimate_from_records(
    records: &[TripRecord],
    target_timestamp: i64,
    trip_distance_km: Option<f64>,
) -> Result<InterpolationResult, OdometerError> {
    let readings = extract_readings(records);
    estimate_odometer(&readings, target_timestamp, trip_distance_km)
}
