use crate::error::NarratorError;
use crate::format_lap_time;
use crate::summary::{DriverAnalysis, DriverAssessment, DriverInsight, RaceSummary, SummaryInput};
use crate::SummaryGenerator;
use analytics::StrategyOption;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Driver, Lap};

/// A narrator that fills a fixed template, weaving in whatever analytics it is given.
///
/// It stands in for a language-model backed generator and needs no network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn new() -> Self {
        Self
    }

    fn assess(&self, driver: &Driver, analysis: Option<&DriverAnalysis>) -> DriverAssessment {
        let mut strengths = strings(&["Consistent lap times", "Good tire management"]);
        let mut weaknesses = strings(&["Struggled in high-fuel race scenarios"]);
        let mut highlights = Vec::new();

        if let Some(degradation) = analysis.and_then(|a| a.degradation.as_ref()) {
            if degradation.degradation_rate <= 0.0 {
                strengths.push(format!(
                    "Lap times improved through the {} stint",
                    degradation.compound
                ));
            } else {
                weaknesses.push(format!(
                    "Lost {:.0} ms per lap to {} tire wear",
                    degradation.degradation_rate, degradation.compound
                ));
            }
            highlights.push(format!(
                "Best performance window laps {}-{}",
                degradation.performance_window.start, degradation.performance_window.end
            ));
        }
        if let Some(braking) = analysis.and_then(|a| a.braking.as_ref()) {
            highlights.push(format!(
                "Peak brake temperature {:.0}°C",
                braking.max_brake_temperature
            ));
        }
        if highlights.is_empty() {
            highlights = strings(&["Best lap in race", "Clean overtake on lap 20"]);
        }

        DriverAssessment {
            driver_id: driver.id.clone(),
            driver_name: driver.name.clone(),
            overall_performance: "Strong race with consistent pace".to_string(),
            strengths,
            weaknesses,
            highlights,
            improvements: strings(&["Work on qualifying setup", "Improve cold tire warm-up"]),
        }
    }
}

fn strategy_paragraph(strategies: &[StrategyOption]) -> String {
    let fastest = strategies.iter().min_by(|a, b| {
        a.predicted_finish_time
            .total_cmp(&b.predicted_finish_time)
    });
    match fastest {
        Some(option) => format!(
            "The {} plan projects the quickest race time of {} with {}% confidence ({} risk).",
            option.name,
            format_lap_time(option.predicted_finish_time),
            option.confidence_score,
            option.risk_level
        ),
        None => "Strategy execution was flawless".to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl SummaryGenerator for TemplateNarrator {
    async fn race_summary(
        &self,
        race_id: &str,
        drivers: &[Driver],
        input: &SummaryInput,
    ) -> Result<RaceSummary, NarratorError> {
        if drivers.is_empty() {
            return Err(NarratorError::NoDrivers(race_id.to_string()));
        }

        let driver_assessments = drivers
            .iter()
            .map(|driver| {
                let analysis = input
                    .driver_analyses
                    .iter()
                    .find(|a| a.driver_id == driver.id);
                self.assess(driver, analysis)
            })
            .collect();

        tracing::debug!(race_id, drivers = drivers.len(), "Writing template race summary");

        Ok(RaceSummary {
            race_id: race_id.to_string(),
            date: Utc::now(),
            circuit: input
                .circuit
                .clone()
                .unwrap_or_else(|| "Circuit TBD".to_string()),
            overall_assessment: "Outstanding team performance with strategic execution.".to_string(),
            driver_assessments,
            car_performance: "Car was competitive throughout the race".to_string(),
            strategy_analysis: strategy_paragraph(&input.strategies),
            predictions: "Expected strong performance at next circuit".to_string(),
            key_learnings: strings(&[
                "Tire pressure optimization worked well",
                "DRS timing was crucial in midfield battles",
            ]),
            recommendations: strings(&[
                "Maintain current front wing setting",
                "Test new brake balance in next session",
            ]),
        })
    }

    async fn driver_profile(
        &self,
        driver_id: &str,
        laps: &[Lap],
    ) -> Result<DriverInsight, NarratorError> {
        Ok(DriverInsight {
            driver_id: driver_id.to_string(),
            strengths: strings(&["Consistency", "Qualifying pace"]),
            weaknesses: strings(&["Race management in traffic"]),
            adaptability: 85.0,
            recommendations: Vec::new(),
            laps_considered: laps.iter().filter(|l| l.driver_id == driver_id).count(),
        })
    }
}
