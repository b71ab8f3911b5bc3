use crate::error::AnalyticsError;
use crate::report::{
    BrakingAnalysis, PedalPressureProfile, PerformancePrediction, PerformanceWindow, RiskLevel,
    StrategyOption, TireDegradationAnalysis,
};
use core_types::{TelemetrySample, TireCompound};

/// Fewest laps a degradation fit is attempted on.
pub const MIN_DEGRADATION_LAPS: usize = 3;
/// Brake pedal percentage above which a sample counts as a braking event.
pub const BRAKING_THRESHOLD_PCT: f64 = 10.0;
/// Smallest race distance for which both canonical strategies have distinct pit laps.
pub const MIN_STRATEGY_RACE_LAPS: u32 = 3;

const BASE_TIRE_TEMPERATURE: f64 = 85.0;
const PEAK_FRACTION_OF_STINT: f64 = 0.3;
const WINDOW_LAPS_BEFORE_PEAK: u32 = 5;
const WINDOW_LAPS_AFTER_PEAK: u32 = 10;
const TWO_STOP_PACE_FACTOR: f64 = 0.95;
const PREDICTION_CONFIDENCE: f64 = 0.75;

/// A stateless calculator for deriving performance metrics from lap and telemetry data.
///
/// Every method is a pure function of its arguments, so a single engine can be
/// shared freely between threads and tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fits an ordinary least-squares line through a stint's lap times.
    ///
    /// # Arguments
    ///
    /// * `lap_times` - Lap times in milliseconds, in lap order. Lap `i` of the
    ///   slice is treated as lap number `i + 1`.
    /// * `compound` - The compound the stint was run on.
    ///
    /// # Returns
    ///
    /// A `TireDegradationAnalysis`, or `InsufficientData` for fewer than three laps
    /// and `DegenerateRegression` when the fit is undefined.
    pub fn tire_degradation(
        &self,
        lap_times: &[f64],
        compound: TireCompound,
    ) -> Result<TireDegradationAnalysis, AnalyticsError> {
        let n = lap_times.len();
        if n < MIN_DEGRADATION_LAPS {
            return Err(AnalyticsError::InsufficientData(format!(
                "need at least {MIN_DEGRADATION_LAPS} laps for degradation analysis, got {n}"
            )));
        }

        let (slope, intercept) = fit_line(lap_times)?;
        let lap_count = n as u32;
        let max_lap_time = max_of(lap_times).ok_or(AnalyticsError::EmptyInput("lap_times"))?;

        tracing::debug!(
            %compound,
            laps = n,
            slope,
            intercept,
            "Fitted tire degradation line"
        );

        Ok(TireDegradationAnalysis {
            compound,
            start_lap: 1,
            end_lap: lap_count,
            degradation_rate: slope,
            intercept,
            expected_life: (max_lap_time / 100.0).round() as u32,
            optimal_temperature: optimal_temperature(compound),
            performance_window: performance_window(lap_count),
        })
    }

    /// Aggregates the braking events in a set of telemetry samples.
    ///
    /// Only samples with brake pressure above `BRAKING_THRESHOLD_PCT` contribute to
    /// the averages. The pedal profile and consistency score are fixed values
    /// until a per-corner model exists.
    pub fn braking(
        &self,
        samples: &[TelemetrySample],
        driver_id: &str,
    ) -> Result<BrakingAnalysis, AnalyticsError> {
        let braking: Vec<&TelemetrySample> = samples
            .iter()
            .filter(|s| s.brake > BRAKING_THRESHOLD_PCT)
            .collect();

        if braking.is_empty() {
            return Err(AnalyticsError::NoBrakingData {
                threshold: BRAKING_THRESHOLD_PCT,
            });
        }

        let count = braking.len() as f64;
        let avg_braking_point = braking.iter().map(|s| s.distance).sum::<f64>() / count;
        let brake_temperature_avg = braking.iter().map(|s| s.brake_temp).sum::<f64>() / count;
        let max_brake_temperature = braking
            .iter()
            .map(|s| s.brake_temp)
            .fold(f64::NEG_INFINITY, f64::max);

        tracing::debug!(
            driver_id,
            total_samples = samples.len(),
            braking_samples = braking.len(),
            "Aggregated braking events"
        );

        Ok(BrakingAnalysis {
            driver_id: driver_id.to_string(),
            avg_braking_point,
            brake_temperature_avg,
            max_brake_temperature,
            pedal_pressure_profile: PedalPressureProfile {
                initial: 0.0,
                peak: 100.0,
                release: 50.0,
            },
            consistency_score: 85.0,
            braking_samples: braking.len(),
        })
    }

    /// Produces the canonical one-stop and two-stop plans, in that order.
    ///
    /// Both finish times are projected from the slowest observed lap.
    ///
    /// Races shorter than `MIN_STRATEGY_RACE_LAPS` are rejected rather than
    /// accepted from one lap up: below three laps the two-stop pit laps would
    /// collide or fall on lap 0.
    pub fn strategy_options(
        &self,
        lap_times: &[f64],
        total_laps: u32,
    ) -> Result<Vec<StrategyOption>, AnalyticsError> {
        let slowest = max_of(lap_times).ok_or(AnalyticsError::EmptyInput("lap_times"))?;
        if total_laps < MIN_STRATEGY_RACE_LAPS {
            return Err(AnalyticsError::InsufficientData(format!(
                "a race needs at least {MIN_STRATEGY_RACE_LAPS} laps to plan pit stops, got {total_laps}"
            )));
        }

        let race_laps = f64::from(total_laps);
        let one_stop_finish = slowest * race_laps;

        let one_stop = StrategyOption {
            id: "one-stop".to_string(),
            name: "One Stop".to_string(),
            compounds: vec![TireCompound::Soft, TireCompound::Hard],
            pit_laps: vec![round_lap(race_laps / 2.0)],
            predicted_finish_time: one_stop_finish,
            confidence_score: 85.0,
            risk_level: RiskLevel::Low,
            pros: strings(&["Fewer pit losses", "Simple execution"]),
            cons: strings(&["Long stints on tires", "Higher tire degradation"]),
        };

        let two_stop = StrategyOption {
            id: "two-stop".to_string(),
            name: "Two Stop".to_string(),
            compounds: vec![TireCompound::Soft, TireCompound::Medium, TireCompound::Hard],
            pit_laps: vec![
                round_lap(race_laps / 3.0),
                round_lap(2.0 * race_laps / 3.0),
            ],
            predicted_finish_time: one_stop_finish * TWO_STOP_PACE_FACTOR,
            confidence_score: 75.0,
            risk_level: RiskLevel::Medium,
            pros: strings(&["Better tire management", "Flexibility"]),
            cons: strings(&["More pit time", "Complex timing"]),
        };

        Ok(vec![one_stop, two_stop])
    }

    /// Adds fuel-load and tire-age penalties to the current lap time.
    ///
    /// Inputs are not range-checked; callers own domain validation.
    pub fn predict_lap_time(
        &self,
        current_lap_time: f64,
        fuel_load: f64,
        tire_age: f64,
    ) -> PerformancePrediction {
        let fuel_penalty = (fuel_load / 100.0) * 0.5;
        let tire_penalty = (tire_age / 50.0) * 2.0;

        PerformancePrediction {
            predicted_lap_time: current_lap_time + fuel_penalty + tire_penalty,
            fuel_penalty,
            tire_penalty,
            confidence: PREDICTION_CONFIDENCE,
        }
    }
}

/// Least-squares slope and intercept of `y` against the 1-based index `x`.
fn fit_line(ys: &[f64]) -> Result<(f64, f64), AnalyticsError> {
    let n = ys.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);

    for (i, &y) in ys.iter().enumerate() {
        let x = (i + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(AnalyticsError::DegenerateRegression(format!(
            "denominator evaluated to {denominator}"
        )));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(AnalyticsError::DegenerateRegression(
            "lap times contain non-finite values".to_string(),
        ));
    }

    Ok((slope, intercept))
}

fn optimal_temperature(compound: TireCompound) -> f64 {
    let adjustment = match compound {
        TireCompound::Soft => 5.0,
        TireCompound::Hard => -5.0,
        _ => 0.0,
    };
    BASE_TIRE_TEMPERATURE + adjustment
}

/// Peak assumed at 30% of the stint; window clamped to `[1, lap_count]`.
fn performance_window(lap_count: u32) -> PerformanceWindow {
    let peak = round_lap(f64::from(lap_count) * PEAK_FRACTION_OF_STINT).clamp(1, lap_count);
    PerformanceWindow {
        start: peak.saturating_sub(WINDOW_LAPS_BEFORE_PEAK).max(1),
        end: (peak + WINDOW_LAPS_AFTER_PEAK).min(lap_count),
        peak_performance: peak,
    }
}

fn round_lap(value: f64) -> u32 {
    value.round() as u32
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
