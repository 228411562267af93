use serde::{Deserialize, Serialize};

use super::normalizer::{is_reading_marker, normalize_label};
use crate::workflows::odometer::domain::{RecordId, RecordKind, TripRecord};

/// Raw record as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecordInput {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub start_odometer_km: Option<f64>,
    #[serde(default)]
    pub end_odometer_km: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("record id must not be empty")]
    EmptyId,
    #[error("record {id}: unknown kind '{kind}' (expected 'reading' or 'trip')")]
    UnknownKind { id: String, kind: String },
    #[error("record {id}: {field} is not a finite number")]
    NonFiniteValue { id: String, field: &'static str },
    #[error("record {id}: {field} must not be negative (got {value})")]
    NegativeValue {
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("record {id}: end odometer {end} km is below start odometer {start} km")]
    EndBeforeStart { id: String, start: f64, end: f64 },
    #[error("record {id}: odometer reading carries no odometer value")]
    ReadingWithoutOdometer { id: String },
}

impl TryFrom<TripRecordInput> for TripRecord {
    type Error = RecordValidationError;

    fn try_from(input: TripRecordInput) -> Result<Self, Self::Error> {
        let id = input.id.trim().to_string();
        if id.is_empty() {
            return Err(RecordValidationError::EmptyId);
        }

        let kind = resolve_kind(&id, &input)?;
        let start = checked_km(&id, "start_odometer_km", input.start_odometer_km)?;
        let end = checked_km(&id, "end_odometer_km", input.end_odometer_km)?;
        let distance = checked_km(&id, "distance_km", input.distance_km)?;

        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(RecordValidationError::EndBeforeStart { id, start, end });
            }
        }

        let (start, end) = match kind {
            RecordKind::Reading => match start.or(end) {
                Some(value) => (Some(value), None),
                None => return Err(RecordValidationError::ReadingWithoutOdometer { id }),
            },
            RecordKind::Trip => (start, end),
        };

        Ok(TripRecord {
            id: RecordId(id),
            timestamp: input.timestamp,
            kind,
            start_odometer_km: start,
            end_odometer_km: end,
            distance_km: if kind == RecordKind::Reading {
                None
            } else {
                distance
            },
        })
    }
}

/// Validate a batch, failing on the first invalid record.
pub fn validate_records(
    inputs: Vec<TripRecordInput>,
) -> Result<Vec<TripRecord>, RecordValidationError> {
    inputs.into_iter().map(TripRecord::try_from).collect()
}

fn resolve_kind(id: &str, input: &TripRecordInput) -> Result<RecordKind, RecordValidationError> {
    if let Some(raw) = input.kind.as_deref().filter(|raw| !raw.trim().is_empty()) {
        return match normalize_label(raw).as_str() {
            "reading" | "odometer_reading" | "odometer reading" => Ok(RecordKind::Reading),
            "trip" => Ok(RecordKind::Trip),
            _ => Err(RecordValidationError::UnknownKind {
                id: id.to_string(),
                kind: raw.to_string(),
            }),
        };
    }

    let marked = [input.departure.as_deref(), input.destination.as_deref()]
        .into_iter()
        .flatten()
        .any(is_reading_marker);

    Ok(if marked {
        RecordKind::Reading
    } else {
        RecordKind::Trip
    })
}

fn checked_km(
    id: &str,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, RecordValidationError> {
    match value {
        Some(value) if !value.is_finite() => Err(RecordValidationError::NonFiniteValue {
            id: id.to_string(),
            field,
        }),
        Some(value) if value < 0.0 => Err(RecordValidationError::NegativeValue {
            id: id.to_string(),
            field,
            value,
        }),
        other => Ok(other),
    }
}
