use core_types::TireCompound;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Laps over which a tire is expected to be at its best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceWindow {
    pub start: u32,
    pub end: u32,
    pub peak_performance: u32,
}

/// The result of fitting a straight line through a stint's lap times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TireDegradationAnalysis {
    pub compound: TireCompound,
    pub start_lap: u32,
    pub end_lap: u32,
    /// ms per lap. Positive means the car is getting slower.
    pub degradation_rate: f64,
    /// Fitted lap time at lap zero, in ms.
    pub intercept: f64,
    /// Coarse placeholder: `round(max lap time / 100)`. The unit does not
    /// actually come out in laps for millisecond inputs.
    pub expected_life: u32,
    /// Celsius
    pub optimal_temperature: f64,
    pub performance_window: PerformanceWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PedalPressureProfile {
    pub initial: f64,
    pub peak: f64,
    pub release: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakingAnalysis {
    pub driver_id: String,
    /// Mean distance of braking samples, in meters.
    pub avg_braking_point: f64,
    pub brake_temperature_avg: f64,
    pub max_brake_temperature: f64,
    pub pedal_pressure_profile: PedalPressureProfile,
    /// 0-100
    pub consistency_score: f64,
    /// Number of samples that counted as braking.
    pub braking_samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(s)
    }
}

/// A candidate race strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOption {
    pub id: String,
    pub name: String,
    pub compounds: Vec<TireCompound>,
    /// Ascending lap numbers in `[1, total_laps]`.
    pub pit_laps: Vec<u32>,
    /// Total race time in ms.
    pub predicted_finish_time: f64,
    /// 0-100
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl StrategyOption {
    pub fn stops(&self) -> usize {
        self.pit_laps.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePrediction {
    pub predicted_lap_time: f64,
    pub fuel_penalty: f64,
    pub tire_penalty: f64,
    pub confidence: f64,
}
