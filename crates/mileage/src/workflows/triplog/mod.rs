//! Trip-log ingestion: the boundary where raw CSV or JSON input becomes
//! validated `TripRecord`s grouped per vehicle.

mod normalizer;
mod parser;
pub mod validation;

use crate::workflows::odometer::audit::{SourceError, TripRecordSource};
use crate::workflows::odometer::domain::{TripRecord, VehicleId};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub use parser::parse_timestamp_ms;
pub use validation::{validate_records, RecordValidationError, TripRecordInput};

#[derive(Debug)]
pub enum TripLogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Timestamp { row: usize, value: String },
    MissingVehicle { row: usize },
    Record { row: usize, source: RecordValidationError },
    DuplicateReading { vehicle_id: VehicleId, timestamp: i64 },
}

impl std::fmt::Display for TripLogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripLogImportError::Io(err) => write!(f, "failed to read trip log: {}", err),
            TripLogImportError::Csv(err) => write!(f, "invalid trip log CSV data: {}", err),
            TripLogImportError::Timestamp { row, value } => {
                write!(f, "row {}: unrecognised timestamp '{}'", row, value)
            }
            TripLogImportError::MissingVehicle { row } => {
                write!(f, "row {}: vehicle_id must not be empty", row)
            }
            TripLogImportError::Record { row, source } => write!(f, "row {}: {}", row, source),
            TripLogImportError::DuplicateReading {
                vehicle_id,
                timestamp,
            } => write!(
                f,
                "vehicle {} has conflicting odometer readings at {}",
                vehicle_id, timestamp
            ),
        }
    }
}

impl std::error::Error for TripLogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TripLogImportError::Io(err) => Some(err),
            TripLogImportError::Csv(err) => Some(err),
            TripLogImportError::Record { source, .. } => Some(source),
            TripLogImportError::Timestamp { .. }
            | TripLogImportError::MissingVehicle { .. }
            | TripLogImportError::DuplicateReading { .. } => None,
        }
    }
}

impl From<std::io::Error> for TripLogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TripLogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Validated records grouped per vehicle, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TripLog {
    vehicles: BTreeMap<VehicleId, Vec<TripRecord>>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. A reading repeating an existing reading's timestamp and
    /// value is dropped as a resubmission; a different value is rejected.
    pub fn insert(
        &mut self,
        vehicle_id: VehicleId,
        record: TripRecord,
    ) -> Result<(), TripLogImportError> {
        let records = self.vehicles.entry(vehicle_id.clone()).or_default();

        if record.is_pure_reading() {
            let existing = records.iter().find(|other| {
                other.is_pure_reading() && other.timestamp == record.timestamp
            });
            if let Some(existing) = existing {
                if existing.start_odometer_km == record.start_odometer_km {
                    debug!(vehicle = %vehicle_id, record = %record.id, "duplicate reading skipped");
                    return Ok(());
                }
                return Err(TripLogImportError::DuplicateReading {
                    vehicle_id,
                    timestamp: record.timestamp,
                });
            }
        }

        records.push(record);
        Ok(())
    }

    pub fn vehicle_ids(&self) -> Vec<VehicleId> {
        self.vehicles.keys().cloned().collect()
    }

    pub fn records(&self, vehicle_id: &VehicleId) -> Option<&[TripRecord]> {
        self.vehicles.get(vehicle_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.vehicles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TripRecordSource for TripLog {
    fn vehicles(&self) -> Result<Vec<VehicleId>, SourceError> {
        Ok(self.vehicle_ids())
    }

    fn records_for(&self, vehicle_id: &VehicleId) -> Result<Vec<TripRecord>, SourceError> {
        self.records(vehicle_id)
            .map(<[TripRecord]>::to_vec)
            .ok_or_else(|| SourceError::NotFound(vehicle_id.clone()))
    }
}

pub struct TripLogImporter;

impl TripLogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<TripLog, TripLogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<TripLog, TripLogImportError> {
        let mut log = TripLog::new();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = index + 1;
            if row.vehicle_id.is_empty() {
                return Err(TripLogImportError::MissingVehicle { row: row_number });
            }

            let timestamp = parser::parse_timestamp_ms(&row.timestamp_raw).ok_or_else(|| {
                TripLogImportError::Timestamp {
                    row: row_number,
                    value: row.timestamp_raw.clone(),
                }
            })?;

            let mut input = row.input;
            input.timestamp = timestamp;
            let record = TripRecord::try_from(input).map_err(|source| {
                TripLogImportError::Record {
                    row: row_number,
                    source,
                }
            })?;

            log.insert(VehicleId(row.vehicle_id), record)?;
        }

        debug!(
            vehicles = log.vehicles.len(),
            records = log.len(),
            "trip log imported"
        );
        Ok(log)
    }
}
