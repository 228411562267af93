use super::validation::TripRecordInput;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct TripLogRow {
    pub(crate) vehicle_id: String,
    pub(crate) timestamp_raw: String,
    pub(crate) input: TripRecordInput,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<TripLogRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        rows.push(TripLogRow {
            vehicle_id: row.vehicle_id,
            timestamp_raw: row.timestamp,
            input: TripRecordInput {
                id: row.id,
                timestamp: 0,
                kind: row.kind,
                departure: row.departure,
                destination: row.destination,
                start_odometer_km: row.start_odometer_km,
                end_odometer_km: row.end_odometer_km,
                distance_km: row.distance_km,
            },
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    vehicle_id: String,
    id: String,
    timestamp: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    departure: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    destination: Option<String>,
    #[serde(default)]
    start_odometer_km: Option<f64>,
    #[serde(default)]
    end_odometer_km: Option<f64>,
    #[serde(default)]
    distance_km: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse a timestamp cell into epoch milliseconds (UTC).
pub fn parse_timestamp_ms(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<i64>().ok();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_timestamp_supports_common_formats() {
        assert_eq!(parse_timestamp_ms("2025-01-01T00:00:00Z"), Some(1_735_689_600_000));
        assert_eq!(
            parse_timestamp_ms("2025-01-01T01:00:00+01:00"),
            Some(1_735_689_600_000)
        );
        assert_eq!(parse_timestamp_ms("2025-01-01 00:00:01"), Some(1_735_689_601_000));
        assert_eq!(parse_timestamp_ms("2025-01-01"), Some(1_735_689_600_000));
        assert_eq!(parse_timestamp_ms("1735689600000"), Some(1_735_689_600_000));
        assert_eq!(parse_timestamp_ms("  "), None);
        assert_eq!(parse_timestamp_ms("yesterday"), None);
    }

    #[test]
    fn empty_cells_are_absent_values() {
        let rows = parse_rows(Cursor::new(
            "vehicle_id,id,timestamp,kind,departure,destination,start_odometer_km,end_odometer_km,distance_km\n\
NL-01,t-1,2025-01-01,,Damrak 1,, 1000 ,,\n",
        ))
        .expect("parse");

        let row = &rows[0];
        assert_eq!(row.vehicle_id, "NL-01");
        assert_eq!(row.input.kind, None);
        assert_eq!(row.input.departure.as_deref(), Some("Damrak 1"));
        assert_eq!(row.input.destination, None);
        assert_eq!(row.input.start_odometer_km, Some(1000.0));
        assert_eq!(row.input.end_odometer_km, None);
    }
}
