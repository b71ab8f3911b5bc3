use analytics::{BrakingAnalysis, StrategyOption, TireDegradationAnalysis};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured analytics handed to a narrator.
#[derive(Debug, Clone, Default)]
pub struct SummaryInput {
    pub circuit: Option<String>,
    pub driver_analyses: Vec<DriverAnalysis>,
    pub strategies: Vec<StrategyOption>,
}

/// Whatever the engine managed to compute for one driver.
#[derive(Debug, Clone)]
pub struct DriverAnalysis {
    pub driver_id: String,
    pub degradation: Option<TireDegradationAnalysis>,
    pub braking: Option<BrakingAnalysis>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub race_id: String,
    pub date: DateTime<Utc>,
    pub circuit: String,
    pub overall_assessment: String,
    pub driver_assessments: Vec<DriverAssessment>,
    pub car_performance: String,
    pub strategy_analysis: String,
    pub predictions: String,
    pub key_learnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverAssessment {
    pub driver_id: String,
    pub driver_name: String,
    pub overall_performance: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub highlights: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInsight {
    pub driver_id: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// 0-100
    pub adaptability: f64,
    pub recommendations: Vec<String>,
    pub laps_considered: usize,
}
