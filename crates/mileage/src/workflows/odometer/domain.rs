use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Discriminates standalone odometer snapshots from trips with a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Reading,
    Trip,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reading => "Odometer reading",
            Self::Trip => "Trip",
        }
    }
}

/// One entry of a vehicle's history: a trip or an odometer-only reading.
///
/// Values are validated once at ingestion (see `workflows::triplog`); the
/// engine treats absent odometer fields as missing data, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: RecordId,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_odometer_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_odometer_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl TripRecord {
    pub fn reading(id: impl Into<String>, timestamp: i64, odometer_km: f64) -> Self {
        Self {
            id: RecordId(id.into()),
            timestamp,
            kind: RecordKind::Reading,
            start_odometer_km: Some(odometer_km),
            end_odometer_km: None,
            distance_km: None,
        }
    }

    pub fn trip(
        id: impl Into<String>,
        timestamp: i64,
        start_odometer_km: Option<f64>,
        end_odometer_km: Option<f64>,
        distance_km: Option<f64>,
    ) -> Self {
        Self {
            id: RecordId(id.into()),
            timestamp,
            kind: RecordKind::Trip,
            start_odometer_km,
            end_odometer_km,
            distance_km,
        }
    }

    pub fn is_pure_reading(&self) -> bool {
        self.kind == RecordKind::Reading
    }

    /// End odometer when recorded, otherwise the start odometer.
    pub fn effective_end_odometer_km(&self) -> Option<f64> {
        self.end_odometer_km.or(self.start_odometer_km)
    }
}

/// Projection of a pure reading record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdometerReading {
    pub id: RecordId,
    pub timestamp: i64,
    pub odometer_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationType {
    OdometerRollback,
    OdometerGap,
    MissingTrips,
    DistanceMismatch,
}

impl DeviationType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::OdometerRollback,
            Self::OdometerGap,
            Self::MissingTrips,
            Self::DistanceMismatch,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OdometerRollback => "Odometer rollback",
            Self::OdometerGap => "Odometer gap",
            Self::MissingTrips => "Missing trips",
            Self::DistanceMismatch => "Distance mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationSeverity {
    Low,
    Medium,
    High,
}

impl DeviationSeverity {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Evidence attached to a deviation so callers can explain the finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviationDetails {
    Rollback {
        from_record: RecordId,
        to_record: RecordId,
        previous_end_km: f64,
        next_start_km: f64,
        difference_km: f64,
    },
    Gap {
        from_record: RecordId,
        to_record: RecordId,
        odometer_delta_km: f64,
        logged_distance_km: f64,
        gap_km: f64,
    },
    UnloggedDistance {
        record: RecordId,
        odometer_span_km: f64,
        logged_distance_km: f64,
        gap_km: f64,
    },
    MissingTrips {
        from_record: RecordId,
        to_record: RecordId,
        elapsed_days: f64,
        odometer_delta_km: f64,
    },
    MissingOdometer {
        from_record: RecordId,
        to_record: RecordId,
        previous_end_km: Option<f64>,
        next_start_km: Option<f64>,
    },
    MissingEndReading {
        record: RecordId,
        start_km: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    #[serde(rename = "type")]
    pub deviation_type: DeviationType,
    pub severity: DeviationSeverity,
    pub description: String,
    pub details: DeviationDetails,
}
