use super::domain::{Deviation, DeviationDetails, DeviationSeverity, DeviationType, TripRecord};
use chrono::Duration;
use serde::Serialize;

/// Odometer slack absorbed before a gap counts as unaccounted distance.
pub const GAP_TOLERANCE_KM: f64 = 1.0;
pub const GAP_MEDIUM_ABOVE_KM: f64 = 20.0;
pub const GAP_HIGH_ABOVE_KM: f64 = 50.0;
pub const MISSING_TRIPS_MIN_DELTA_KM: f64 = 100.0;
pub const MISSING_TRIPS_MIN_SILENCE_DAYS: i64 = 7;
pub const MISSING_TRIPS_HIGH_SILENCE_DAYS: i64 = 30;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Deviations found in a vehicle's trip history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleAnalysis {
    pub deviations: Vec<Deviation>,
    pub total_unaccounted_km: f64,
}

/// Audit the trips of one vehicle for rollbacks, gaps and missing data.
///
/// Pure readings are ignored. Each consecutive trip pair is checked
/// independently, except that missing odometer data or a rollback stops the
/// gap and missing-trip checks for that pair.
pub fn analyze_vehicle(records: &[TripRecord]) -> VehicleAnalysis {
    let mut trips: Vec<&TripRecord> = records
        .iter()
        .filter(|record| !record.is_pure_reading())
        .collect();
    trips.sort_by_key(|trip| trip.timestamp);

    let mut analysis = VehicleAnalysis::default();
    if trips.len() < 2 {
        return analysis;
    }

    for (index, current) in trips.iter().enumerate() {
        check_trip_span(current, &mut analysis);

        if let Some(next) = trips.get(index + 1) {
            check_pair(current, next, &mut analysis);

            if current.end_odometer_km.is_none() {
                analysis.deviations.push(Deviation {
                    deviation_type: DeviationType::DistanceMismatch,
                    severity: DeviationSeverity::Medium,
                    description: format!("Trip {} without end reading", current.id),
                    details: DeviationDetails::MissingEndReading {
                        record: current.id.clone(),
                        start_km: current.start_odometer_km,
                    },
                });
            }
        }
    }

    analysis
}

fn check_pair(current: &TripRecord, next: &TripRecord, analysis: &mut VehicleAnalysis) {
    let (previous_end, next_start) =
        match (current.effective_end_odometer_km(), next.start_odometer_km) {
            (Some(previous_end), Some(next_start)) => (previous_end, next_start),
            (previous_end, next_start) => {
                analysis.deviations.push(Deviation {
                    deviation_type: DeviationType::DistanceMismatch,
                    severity: DeviationSeverity::Medium,
                    description: format!(
                        "Trip without odometer reading between {} and {}",
                        current.id, next.id
                    ),
                    details: DeviationDetails::MissingOdometer {
                        from_record: current.id.clone(),
                        to_record: next.id.clone(),
                        previous_end_km: previous_end,
                        next_start_km: next_start,
                    },
                });
                return;
            }
        };

    if next_start < previous_end {
        let difference = previous_end - next_start;
        analysis.deviations.push(Deviation {
            deviation_type: DeviationType::OdometerRollback,
            severity: DeviationSeverity::High,
            description: format!(
                "Odometer rolled back {difference:.0} km: trip {} ended at {previous_end:.0} km, trip {} started at {next_start:.0} km",
                current.id, next.id
            ),
            details: DeviationDetails::Rollback {
                from_record: current.id.clone(),
                to_record: next.id.clone(),
                previous_end_km: previous_end,
                next_start_km: next_start,
                difference_km: difference,
            },
        });
        return;
    }

    let odometer_delta = next_start - previous_end;
    let logged_distance = current.distance_km.unwrap_or(0.0);
    let gap = odometer_delta - logged_distance;
    if gap > GAP_TOLERANCE_KM {
        analysis.deviations.push(Deviation {
            deviation_type: DeviationType::OdometerGap,
            severity: gap_severity(gap),
            description: format!(
                "{gap:.0} km unaccounted between trips {} and {}",
                current.id, next.id
            ),
            details: DeviationDetails::Gap {
                from_record: current.id.clone(),
                to_record: next.id.clone(),
                odometer_delta_km: odometer_delta,
                logged_distance_km: logged_distance,
                gap_km: gap,
            },
        });
        analysis.total_unaccounted_km += gap;
    }

    let elapsed_ms = next.timestamp.saturating_sub(current.timestamp);
    let silence = Duration::days(MISSING_TRIPS_MIN_SILENCE_DAYS).num_milliseconds();
    if elapsed_ms > silence && odometer_delta > MISSING_TRIPS_MIN_DELTA_KM {
        let elapsed_days = elapsed_ms as f64 / MS_PER_DAY;
        let high_after = Duration::days(MISSING_TRIPS_HIGH_SILENCE_DAYS).num_milliseconds();
        let severity = if elapsed_ms > high_after {
            DeviationSeverity::High
        } else {
            DeviationSeverity::Medium
        };

        analysis.deviations.push(Deviation {
            deviation_type: DeviationType::MissingTrips,
            severity,
            description: format!(
                "{odometer_delta:.0} km driven over {elapsed_days:.0} days without logged trips after {}",
                current.id
            ),
            details: DeviationDetails::MissingTrips {
                from_record: current.id.clone(),
                to_record: next.id.clone(),
                elapsed_days,
                odometer_delta_km: odometer_delta,
            },
        });
    }
}

fn check_trip_span(trip: &TripRecord, analysis: &mut VehicleAnalysis) {
    let (Some(start), Some(end), Some(logged_distance)) =
        (trip.start_odometer_km, trip.end_odometer_km, trip.distance_km)
    else {
        return;
    };

    let span = end - start;
    let gap = span - logged_distance;
    if gap > GAP_TOLERANCE_KM {
        analysis.deviations.push(Deviation {
            deviation_type: DeviationType::OdometerGap,
            severity: gap_severity(gap),
            description: format!(
                "Trip {} covers {span:.0} km on the odometer but logs {logged_distance:.0} km",
                trip.id
            ),
            details: DeviationDetails::UnloggedDistance {
                record: trip.id.clone(),
                odometer_span_km: span,
                logged_distance_km: logged_distance,
                gap_km: gap,
            },
        });
        analysis.total_unaccounted_km += gap;
    }
}

fn gap_severity(gap_km: f64) -> DeviationSeverity {
    if gap_km > GAP_HIGH_ABOVE_KM {
        DeviationSeverity::High
    } else if gap_km > GAP_MEDIUM_ABOVE_KM {
        DeviationSeverity::Medium
    } else {
        DeviationSeverity::Low
    }
}
