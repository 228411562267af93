use mileage::workflows::odometer::{
    analyze_vehicle, compliance_score, ComplianceReport, DeviationDetails, DeviationSeverity,
    DeviationType, TripRecord, VehicleId,
};

const DAY_MS: i64 = 86_400_000;

fn types(records: &[TripRecord]) -> Vec<DeviationType> {
    analyze_vehicle(records)
        .deviations
        .into_iter()
        .map(|deviation| deviation.deviation_type)
        .collect()
}

#[test]
fn logged_distance_short_of_odometer_span_is_a_low_gap() {
    let records = vec![
        TripRecord::trip("t-1", DAY_MS, None, Some(1000.0), None),
        TripRecord::trip("t-2", 2 * DAY_MS, Some(1000.0), Some(1080.0), Some(75.0)),
    ];

    let report = ComplianceReport::audit(VehicleId::from("NL-01"), &records);
    assert_eq!(report.deviations.len(), 1);
    assert_eq!(report.deviations[0].deviation_type, DeviationType::OdometerGap);
    assert_eq!(report.deviations[0].severity, DeviationSeverity::Low);
    assert_eq!(report.total_unaccounted_km, 5.0);
    assert_eq!(report.compliance_score, 95);
}

#[test]
fn rollback_suppresses_gap_and_missing_trip_findings() {
    let records = vec![
        TripRecord::trip("t-1", 0, Some(1000.0), Some(1200.0), None),
        TripRecord::trip("t-2", 60 * DAY_MS, Some(1100.0), Some(1150.0), None),
    ];

    let analysis = analyze_vehicle(&records);
    assert_eq!(types(&records), vec![DeviationType::OdometerRollback]);
    assert_eq!(analysis.total_unaccounted_km, 0.0);
    match &analysis.deviations[0].details {
        DeviationDetails::Rollback {
            previous_end_km,
            next_start_km,
            difference_km,
            ..
        } => {
            assert_eq!(*previous_end_km, 1200.0);
            assert_eq!(*next_start_km, 1100.0);
            assert_eq!(*difference_km, 100.0);
        }
        other => panic!("expected rollback details, got {other:?}"),
    }
    assert_eq!(analysis.deviations[0].severity, DeviationSeverity::High);
}

#[test]
fn gap_severity_follows_unaccounted_distance() {
    let pair = |next_start: f64| {
        vec![
            TripRecord::trip("t-1", 0, Some(1000.0), Some(1050.0), Some(50.0)),
            TripRecord::trip("t-2", DAY_MS, Some(next_start), Some(next_start + 5.0), None),
        ]
    };

    // Gap is the odometer delta minus the 50 km logged on t-1.
    let low = analyze_vehicle(&pair(1115.0));
    let medium = analyze_vehicle(&pair(1130.0));
    let high = analyze_vehicle(&pair(1160.0));

    assert_eq!(low.deviations.len(), 1);
    assert_eq!(low.deviations[0].severity, DeviationSeverity::Low);
    assert_eq!(low.total_unaccounted_km, 15.0);
    assert_eq!(medium.deviations[0].severity, DeviationSeverity::Medium);
    assert_eq!(high.deviations[0].severity, DeviationSeverity::High);
    assert_eq!(high.total_unaccounted_km, 60.0);
}

#[test]
fn long_silence_with_large_delta_flags_missing_trips() {
    let records = |days: i64| {
        vec![
            TripRecord::trip("t-1", 0, Some(1000.0), Some(1050.0), Some(50.0)),
            TripRecord::trip("t-2", days * DAY_MS, Some(1200.0), Some(1210.0), Some(10.0)),
        ]
    };

    let medium = analyze_vehicle(&records(10));
    let missing: Vec<_> = medium
        .deviations
        .iter()
        .filter(|deviation| deviation.deviation_type == DeviationType::MissingTrips)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, DeviationSeverity::Medium);

    let high = analyze_vehicle(&records(31));
    assert!(high.deviations.iter().any(|deviation| {
        deviation.deviation_type == DeviationType::MissingTrips
            && deviation.severity == DeviationSeverity::High
    }));

    // Exactly seven days is not a silent period.
    assert!(!types(&records(7)).contains(&DeviationType::MissingTrips));
}

#[test]
fn small_delta_over_long_silence_is_not_missing_trips() {
    let records = vec![
        TripRecord::trip("t-1", 0, Some(1000.0), Some(1050.0), None),
        TripRecord::trip("t-2", 90 * DAY_MS, Some(1100.0), Some(1150.0), None),
    ];

    assert!(!types(&records).contains(&DeviationType::MissingTrips));
}

#[test]
fn missing_odometer_data_skips_pair_arithmetic() {
    let records = vec![
        TripRecord::trip("t-1", 0, None, None, Some(20.0)),
        TripRecord::trip("t-2", 60 * DAY_MS, Some(9000.0), Some(9010.0), None),
    ];

    let analysis = analyze_vehicle(&records);
    assert_eq!(
        types(&records),
        vec![DeviationType::DistanceMismatch, DeviationType::DistanceMismatch]
    );
    assert!(matches!(
        analysis.deviations[0].details,
        DeviationDetails::MissingOdometer { .. }
    ));
    assert!(matches!(
        analysis.deviations[1].details,
        DeviationDetails::MissingEndReading { .. }
    ));
    assert_eq!(analysis.total_unaccounted_km, 0.0);
}

#[test]
fn trip_without_end_reading_is_flagged_alongside_pair_checks() {
    let records = vec![
        TripRecord::trip("t-1", 0, Some(1000.0), None, None),
        TripRecord::trip("t-2", DAY_MS, Some(1030.0), Some(1040.0), None),
    ];

    let analysis = analyze_vehicle(&records);
    assert_eq!(
        types(&records),
        vec![DeviationType::OdometerGap, DeviationType::DistanceMismatch]
    );
    assert_eq!(analysis.total_unaccounted_km, 30.0);
    assert_eq!(analysis.deviations[1].severity, DeviationSeverity::Medium);
}

#[test]
fn unsorted_input_is_analyzed_chronologically() {
    let sorted = vec![
        TripRecord::trip("t-1", 0, Some(1000.0), Some(1050.0), Some(50.0)),
        TripRecord::trip("t-2", DAY_MS, Some(1080.0), Some(1100.0), Some(20.0)),
        TripRecord::trip("t-3", 2 * DAY_MS, Some(1100.0), Some(1130.0), Some(30.0)),
    ];
    let shuffled = vec![sorted[2].clone(), sorted[0].clone(), sorted[1].clone()];

    assert_eq!(analyze_vehicle(&sorted), analyze_vehicle(&shuffled));
}

#[test]
fn analysis_is_idempotent() {
    let records = vec![
        TripRecord::reading("r-1", 0, 990.0),
        TripRecord::trip("t-1", DAY_MS, Some(1000.0), None, Some(40.0)),
        TripRecord::trip("t-2", 20 * DAY_MS, Some(1500.0), Some(1600.0), Some(90.0)),
        TripRecord::trip("t-3", 21 * DAY_MS, Some(1550.0), Some(1700.0), None),
    ];

    let first = ComplianceReport::audit(VehicleId::from("NL-01"), &records);
    let second = ComplianceReport::audit(VehicleId::from("NL-01"), &records);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn score_is_monotonic_in_deviation_count() {
    let records = vec![
        TripRecord::trip("t-1", 0, Some(1000.0), None, None),
        TripRecord::trip("t-2", 60 * DAY_MS, Some(1500.0), None, None),
        TripRecord::trip("t-3", 61 * DAY_MS, Some(1400.0), Some(1450.0), None),
    ];
    let analysis = analyze_vehicle(&records);
    assert!(analysis.deviations.len() >= 3);

    for split in 0..analysis.deviations.len() {
        let subset = &analysis.deviations[..split];
        let superset = &analysis.deviations[..split + 1];
        assert!(
            compliance_score(subset, analysis.total_unaccounted_km)
                >= compliance_score(superset, analysis.total_unaccounted_km)
        );
    }
}
