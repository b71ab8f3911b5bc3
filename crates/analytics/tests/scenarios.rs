use analytics::{AnalyticsEngine, AnalyticsError, RiskLevel, lap_times_for};
use core_types::{Lap, TelemetrySample, TireCompound};

fn telemetry(json: &str) -> Vec<TelemetrySample> {
    serde_json::from_str(json).expect("fixture should deserialize")
}

#[test]
fn strategy_options_for_fifty_lap_race() {
    let engine = AnalyticsEngine::new();
    let options = engine
        .strategy_options(&[90_000.0, 91_000.0, 89_500.0], 50)
        .unwrap();

    assert_eq!(options.len(), 2);

    let one_stop = &options[0];
    assert_eq!(one_stop.id, "one-stop");
    assert_eq!(one_stop.pit_laps, vec![25]);
    assert_eq!(one_stop.compounds, vec![TireCompound::Soft, TireCompound::Hard]);
    assert_eq!(one_stop.predicted_finish_time, 4_550_000.0);
    assert_eq!(one_stop.confidence_score, 85.0);
    assert_eq!(one_stop.risk_level, RiskLevel::Low);

    let two_stop = &options[1];
    assert_eq!(two_stop.id, "two-stop");
    assert_eq!(two_stop.pit_laps, vec![17, 33]);
    assert_eq!(
        two_stop.compounds,
        vec![TireCompound::Soft, TireCompound::Medium, TireCompound::Hard]
    );
    assert!((two_stop.predicted_finish_time - 4_322_500.0).abs() < 1e-6);
    assert_eq!(two_stop.confidence_score, 75.0);
    assert_eq!(two_stop.risk_level, RiskLevel::Medium);
}

#[test]
fn lap_time_prediction_matches_reference_values() {
    let prediction = AnalyticsEngine::new().predict_lap_time(90_000.0, 50.0, 20.0);
    assert_eq!(prediction.fuel_penalty, 0.25);
    assert!((prediction.tire_penalty - 0.8).abs() < 1e-12);
    assert!((prediction.predicted_lap_time - 90_001.05).abs() < 1e-9);
    assert_eq!(prediction.confidence, 0.75);
}

#[test]
fn optimal_temperature_depends_on_compound() {
    let engine = AnalyticsEngine::new();
    let laps = [91_200.0, 91_350.0, 91_420.0, 91_600.0];
    let temperature = |compound| {
        engine
            .tire_degradation(&laps, compound)
            .unwrap()
            .optimal_temperature
    };
    assert_eq!(temperature(TireCompound::Soft), 90.0);
    assert_eq!(temperature(TireCompound::Medium), 85.0);
    assert_eq!(temperature(TireCompound::Hard), 80.0);
    assert_eq!(temperature(TireCompound::Intermediate), 85.0);
    assert_eq!(temperature(TireCompound::Wet), 85.0);
}

#[test]
fn degradation_rejects_two_laps_and_empty_input() {
    let engine = AnalyticsEngine::new();
    for laps in [&[][..], &[90_000.0, 90_100.0][..]] {
        let err = engine.tire_degradation(laps, TireCompound::Soft).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }
}

#[test]
fn braking_without_pedal_above_threshold_fails() {
    let samples = telemetry(
        r#"[
        {"timestamp":0,"lapNumber":1,"distance":120,"throttle":100,"brake":0,
         "speed":300,"rpm":11500,"gear":8,"drsActive":true,"brakeTemp":350},
        {"timestamp":40,"lapNumber":1,"distance":140,"throttle":20,"brake":10,
         "speed":295,"rpm":11400,"gear":8,"drsActive":false,"brakeTemp":360}
    ]"#,
    );
    let err = AnalyticsEngine::new().braking(&samples, "NOR").unwrap_err();
    assert!(matches!(err, AnalyticsError::NoBrakingData { .. }));
}

#[test]
fn braking_analysis_over_a_corner_entry() {
    let samples = telemetry(
        r#"[
        {"timestamp":0,"lapNumber":7,"distance":610,"throttle":100,"brake":0,
         "speed":318,"rpm":11900,"gear":8,"drsActive":true,"brakeTemp":410},
        {"timestamp":40,"lapNumber":7,"distance":640,"throttle":0,"brake":98,
         "speed":301,"rpm":11600,"gear":8,"drsActive":false,"brakeTemp":620},
        {"timestamp":80,"lapNumber":7,"distance":660,"throttle":0,"brake":74,
         "speed":240,"rpm":10800,"gear":6,"drsActive":false,"brakeTemp":780},
        {"timestamp":120,"lapNumber":7,"distance":680,"throttle":0,"brake":31,
         "speed":170,"rpm":9600,"gear":4,"drsActive":false,"brakeTemp":740}
    ]"#,
    );
    let analysis = AnalyticsEngine::new().braking(&samples, "PIA").unwrap();
    assert_eq!(analysis.braking_samples, 3);
    assert_eq!(analysis.avg_braking_point, 660.0);
    assert!((analysis.brake_temperature_avg - 713.333_333).abs() < 1e-3);
    assert_eq!(analysis.max_brake_temperature, 780.0);
}

#[test]
fn results_serialize_with_camel_case_keys() {
    let analysis = AnalyticsEngine::new()
        .tire_degradation(&[90_000.0, 90_050.0, 90_100.0], TireCompound::Soft)
        .unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["compound"], "SOFT");
    assert_eq!(json["performanceWindow"]["peakPerformance"], 1);
    assert_eq!(json["degradationRate"], 50.0);
}

#[test]
fn degradation_over_a_stint_with_a_pit_lap_keeps_the_true_rate() {
    // Lap 4 has no recorded time, as happens for pit-in laps.
    let laps: Vec<Lap> = [1u32, 2, 3, 5, 6, 7]
        .into_iter()
        .map(|number| Lap {
            id: format!("1-{number}"),
            number,
            driver_id: "1".to_string(),
            session_id: "9158".to_string(),
            time: 90_000.0 + 100.0 * f64::from(number),
            sector1: 0.0,
            sector2: 0.0,
            sector3: 0.0,
            is_personal_best: false,
            is_session_best: false,
        })
        .collect();

    let series = lap_times_for(&laps, "1");
    assert_eq!(series, vec![90_500.0, 90_600.0, 90_700.0]);

    let analysis = AnalyticsEngine::new()
        .tire_degradation(&series, TireCompound::Medium)
        .unwrap();
    assert!((analysis.degradation_rate - 100.0).abs() < 1e-9);
    assert_eq!(analysis.end_lap, 3);
}
