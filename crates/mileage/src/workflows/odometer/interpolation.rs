use super::domain::OdometerReading;
use serde::{Deserialize, Serialize};

/// Failures raised while estimating an odometer value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OdometerError {
    #[error("cannot estimate, no baseline reading yet (none at or before {target_timestamp})")]
    NoPreviousReading { target_timestamp: i64 },
    #[error("bracketing readings have no positive time delta ({previous} -> {next})")]
    InvalidTimestamp { previous: i64, next: i64 },
    #[error("odometer calculation failed: {0}")]
    Calculation(String),
}

/// Readings the estimate was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedFrom {
    pub previous: OdometerReading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<OdometerReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationResult {
    pub start_odometer_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_odometer_km: Option<f64>,
    pub calculated_from: CalculatedFrom,
}

/// Estimate the odometer at `target_timestamp` from surrounding readings.
///
/// Interpolates linearly between the closest readings on both sides and falls
/// back to the last known value when nothing later exists. Never extrapolates
/// before the earliest reading. Results are whole kilometers.
pub fn estimate_odometer(
    readings: &[OdometerReading],
    target_timestamp: i64,
    trip_distance_km: Option<f64>,
) -> Result<InterpolationResult, OdometerError> {
    if let Some(distance) = trip_distance_km {
        if !distance.is_finite() {
            return Err(OdometerError::Calculation(format!(
                "trip distance {distance} is not finite"
            )));
        }
    }

    let mut previous: Option<&OdometerReading> = None;
    let mut next: Option<&OdometerReading> = None;

    for reading in readings {
        if !reading.odometer_km.is_finite() {
            return Err(OdometerError::Calculation(format!(
                "reading {} has non-finite odometer value",
                reading.id
            )));
        }

        if reading.timestamp <= target_timestamp {
            if previous.map_or(true, |current| reading.timestamp >= current.timestamp) {
                previous = Some(reading);
            }
        } else if next.map_or(true, |current| reading.timestamp < current.timestamp) {
            next = Some(reading);
        }
    }

    let previous = previous.ok_or(OdometerError::NoPreviousReading { target_timestamp })?;

    let start = match next {
        Some(next) => {
            let span = next.timestamp - previous.timestamp;
            if span <= 0 {
                return Err(OdometerError::InvalidTimestamp {
                    previous: previous.timestamp,
                    next: next.timestamp,
                });
            }

            let elapsed = (target_timestamp - previous.timestamp) as f64;
            previous.odometer_km
                + (next.odometer_km - previous.odometer_km) * elapsed / span as f64
        }
        None => previous.odometer_km,
    };

    let end = trip_distance_km
        .filter(|distance| *distance > 0.0)
        .map(|distance| start + distance);

    let start_odometer_km = round_km(start)?;
    let end_odometer_km = end.map(round_km).transpose()?;

    Ok(InterpolationResult {
        start_odometer_km,
        end_odometer_km,
        calculated_from: CalculatedFrom {
            previous: previous.clone(),
            next: next.cloned(),
        },
    })
}

// Odometers are whole-km instruments; f64::round is half away from zero.
fn round_km(value: f64) -> Result<f64, OdometerError> {
    if value.is_finite() {
        Ok(value.round())
    } else {
        Err(OdometerError::Calculation(format!(
            "estimate {value} is not finite"
        )))
    }
}
