use analytics::{BrakingAnalysis, PerformancePrediction, StrategyOption, TireDegradationAnalysis};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use core_types::Race;
use narrator::{RaceSummary, format_lap_time};
use serde::Serialize;

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn key_value_table(title: &str, rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new(title), Cell::new("")]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

pub fn degradation_table(analysis: &TireDegradationAnalysis) -> Table {
    let window = &analysis.performance_window;
    key_value_table(
        &format!("Tire degradation ({})", analysis.compound),
        vec![
            ("Laps", format!("{}-{}", analysis.start_lap, analysis.end_lap)),
            ("Degradation rate", format!("{:+.1} ms/lap", analysis.degradation_rate)),
            ("Fitted lap-zero time", format_lap_time(analysis.intercept)),
            ("Expected life", analysis.expected_life.to_string()),
            ("Optimal temperature", format!("{:.0} °C", analysis.optimal_temperature)),
            (
                "Performance window",
                format!("laps {}-{} (peak {})", window.start, window.end, window.peak_performance),
            ),
        ],
    )
}

pub fn braking_table(analysis: &BrakingAnalysis) -> Table {
    let profile = &analysis.pedal_pressure_profile;
    key_value_table(
        &format!("Braking ({})", analysis.driver_id),
        vec![
            ("Braking samples", analysis.braking_samples.to_string()),
            ("Average braking point", format!("{:.1} m", analysis.avg_braking_point)),
            ("Average brake temperature", format!("{:.0} °C", analysis.brake_temperature_avg)),
            ("Max brake temperature", format!("{:.0} °C", analysis.max_brake_temperature)),
            (
                "Pedal profile",
                format!("{:.0}% / {:.0}% / {:.0}%", profile.initial, profile.peak, profile.release),
            ),
            ("Consistency score", format!("{:.0}", analysis.consistency_score)),
        ],
    )
}

pub fn strategy_table(options: &[StrategyOption]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Strategy",
            "Stops",
            "Compounds",
            "Pit laps",
            "Predicted finish",
            "Confidence",
            "Risk",
        ]);
    for option in options {
        let compounds: Vec<String> = option.compounds.iter().map(|c| c.to_string()).collect();
        let pit_laps: Vec<String> = option.pit_laps.iter().map(|l| l.to_string()).collect();
        table.add_row(vec![
            option.name.clone(),
            option.stops().to_string(),
            compounds.join(" → "),
            pit_laps.join(", "),
            format_lap_time(option.predicted_finish_time),
            format!("{:.0}", option.confidence_score),
            option.risk_level.to_string(),
        ]);
    }
    table
}

pub fn prediction_table(prediction: &PerformancePrediction) -> Table {
    key_value_table(
        "Lap-time prediction",
        vec![
            ("Predicted lap time", format_lap_time(prediction.predicted_lap_time)),
            ("Fuel penalty", format!("{:.3} ms", prediction.fuel_penalty)),
            ("Tire penalty", format!("{:.3} ms", prediction.tire_penalty)),
            ("Confidence", format!("{:.2}", prediction.confidence)),
        ],
    )
}

pub fn races_table(races: &[Race]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Round", "Race", "Circuit", "Date", "Id"]);
    for race in races {
        table.add_row(vec![
            race.round.to_string(),
            race.name.clone(),
            race.circuit.clone(),
            race.date.to_string(),
            race.id.clone(),
        ]);
    }
    table
}

pub fn print_summary(summary: &RaceSummary) {
    println!("\n=== {} - {} ===", summary.race_id, summary.circuit);
    println!("{}", summary.overall_assessment);
    for driver in &summary.driver_assessments {
        println!("\n{} ({})", driver.driver_name, driver.driver_id);
        println!("  {}", driver.overall_performance);
        println!("  + {}", driver.strengths.join("; "));
        println!("  - {}", driver.weaknesses.join("; "));
        println!("  * {}", driver.highlights.join("; "));
    }
    println!("\nCar: {}", summary.car_performance);
    println!("Strategy: {}", summary.strategy_analysis);
    println!("Outlook: {}", summary.predictions);
    println!("Recommendations: {}", summary.recommendations.join("; "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;

    #[test]
    fn strategy_table_lists_stop_counts() {
        let options = AnalyticsEngine::new()
            .strategy_options(&[90_000.0, 91_000.0], 50)
            .unwrap();
        assert_eq!(options[0].stops(), 1);
        assert_eq!(options[1].stops(), 2);

        let text = strategy_table(&options).to_string();
        assert!(text.contains("Stops"));
        assert!(text.contains("17, 33"));
    }
}
