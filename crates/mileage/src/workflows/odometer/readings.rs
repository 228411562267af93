use super::domain::{OdometerReading, TripRecord};

/// Narrow a vehicle's records to pure odometer readings, ascending by timestamp.
///
/// The sort is stable so readings sharing a timestamp keep their input order.
/// A reading record without an odometer value has nothing to project and is
/// skipped.
pub fn extract_readings(records: &[TripRecord]) -> Vec<OdometerReading> {
    let mut readings: Vec<OdometerReading> = records
        .iter()
        .filter(|record| record.is_pure_reading())
        .filter_map(|record| {
            record.start_odometer_km.map(|odometer_km| OdometerReading {
                id: record.id.clone(),
                timestamp: record.timestamp,
                odometer_km,
            })
        })
        .collect();

    readings.sort_by_key(|reading| reading.timestamp);
    readings
}
