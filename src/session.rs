use analytics::{
    AnalyticsEngine, BrakingAnalysis, StrategyOption, TireDegradationAnalysis, drivers_in,
    lap_times_for,
};
use anyhow::Context;
use api_client::ProviderSet;
use core_types::{Driver, Lap, TelemetrySample, TireCompound};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use narrator::{DriverAnalysis, RaceSummary, SummaryGenerator, SummaryInput, TemplateNarrator};
use serde::Serialize;

/// Everything computed for one driver in a session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverReport {
    pub driver_id: String,
    pub laps: usize,
    pub degradation: Option<TireDegradationAnalysis>,
    pub braking: Option<BrakingAnalysis>,
    pub strategies: Vec<StrategyOption>,
    /// Analyses that could not be computed, with the reason.
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub total_laps: u32,
    pub drivers: Vec<DriverReport>,
    pub summary: RaceSummary,
}

pub struct SessionRequest {
    pub year: i32,
    pub session_id: String,
    pub driver_ids: Vec<String>,
    pub compound: TireCompound,
    pub total_laps: Option<u32>,
}

/// Fetches a session's laps and per-driver telemetry, then runs every analysis.
pub async fn analyze_session(
    providers: &ProviderSet,
    request: SessionRequest,
) -> anyhow::Result<SessionReport> {
    let provider = providers.for_season(request.year);
    tracing::info!(
        provider = provider.name(),
        session = %request.session_id,
        "Fetching lap times"
    );

    let laps = provider
        .fetch_lap_times(&request.session_id)
        .await
        .with_context(|| format!("failed to fetch lap times for session {}", request.session_id))?;

    let driver_ids = if request.driver_ids.is_empty() {
        drivers_in(&laps)
    } else {
        request.driver_ids.clone()
    };
    anyhow::ensure!(
        !driver_ids.is_empty(),
        "session {} has no laps to analyse",
        request.session_id
    );

    let total_laps = request
        .total_laps
        .or_else(|| laps.iter().map(|l| l.number).max())
        .unwrap_or_default();

    let telemetry = fetch_all_telemetry(providers, &request, &driver_ids).await?;
    let roster = roster(providers, request.year, &driver_ids).await;

    let engine = AnalyticsEngine::new();
    let reports: Vec<DriverReport> = driver_ids
        .iter()
        .zip(telemetry)
        .map(|(driver_id, samples)| {
            analyze_driver(&engine, driver_id, &laps, &samples, request.compound, total_laps)
        })
        .collect();

    let input = SummaryInput {
        circuit: None,
        driver_analyses: reports
            .iter()
            .map(|r| DriverAnalysis {
                driver_id: r.driver_id.clone(),
                degradation: r.degradation.clone(),
                braking: r.braking.clone(),
            })
            .collect(),
        strategies: reports
            .iter()
            .find(|r| !r.strategies.is_empty())
            .map(|r| r.strategies.clone())
            .unwrap_or_default(),
    };
    let summary = TemplateNarrator::new()
        .race_summary(&request.session_id, &roster, &input)
        .await?;

    Ok(SessionReport {
        session_id: request.session_id,
        total_laps,
        drivers: reports,
        summary,
    })
}

/// Downloads telemetry for every driver concurrently, preserving input order.
async fn fetch_all_telemetry(
    providers: &ProviderSet,
    request: &SessionRequest,
    driver_ids: &[String],
) -> anyhow::Result<Vec<Vec<TelemetrySample>>> {
    let progress_bar = ProgressBar::new(driver_ids.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let tasks: Vec<_> = driver_ids
        .iter()
        .map(|driver_id| {
            let providers = providers.clone();
            let session_id = request.session_id.clone();
            let driver_id = driver_id.clone();
            let year = request.year;
            let pb = progress_bar.clone();

            tokio::spawn(async move {
                pb.set_message(format!("Fetching telemetry for {driver_id}..."));
                let result = providers
                    .for_season(year)
                    .fetch_telemetry(&session_id, &driver_id)
                    .await;
                pb.inc(1);
                result.with_context(|| format!("failed to fetch telemetry for driver {driver_id}"))
            })
        })
        .collect();

    let results = join_all(tasks).await;
    progress_bar.finish_with_message("Telemetry downloaded");

    let mut telemetry = Vec::with_capacity(results.len());
    for (driver_id, result) in driver_ids.iter().zip(results) {
        match result? {
            Ok(samples) => telemetry.push(samples),
            Err(e) => {
                tracing::warn!(driver_id = %driver_id, error = %e, "Continuing without telemetry");
                telemetry.push(Vec::new());
            }
        }
    }
    Ok(telemetry)
}

/// Looks up driver details, falling back to bare ids when the roster is unavailable.
async fn roster(providers: &ProviderSet, year: i32, driver_ids: &[String]) -> Vec<Driver> {
    let known = match providers.for_season(year).fetch_drivers(year).await {
        Ok(drivers) => drivers,
        Err(e) => {
            tracing::warn!(error = %e, "Driver roster unavailable");
            Vec::new()
        }
    };

    driver_ids
        .iter()
        .map(|id| {
            known
                .iter()
                .find(|d| &d.id == id)
                .cloned()
                .unwrap_or_else(|| Driver {
                    id: id.clone(),
                    number: id.parse().unwrap_or_default(),
                    name: id.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    team: String::new(),
                    team_color: String::new(),
                    nationality: String::new(),
                    photo: None,
                })
        })
        .collect()
}

pub fn analyze_driver(
    engine: &AnalyticsEngine,
    driver_id: &str,
    laps: &[Lap],
    telemetry: &[TelemetrySample],
    compound: TireCompound,
    total_laps: u32,
) -> DriverReport {
    let lap_times = lap_times_for(laps, driver_id);
    let mut skipped = Vec::new();

    let degradation = engine
        .tire_degradation(&lap_times, compound)
        .map_err(|e| skipped.push(format!("degradation: {e}")))
        .ok();
    let braking = engine
        .braking(telemetry, driver_id)
        .map_err(|e| skipped.push(format!("braking: {e}")))
        .ok();
    let strategies = engine
        .strategy_options(&lap_times, total_laps)
        .map_err(|e| skipped.push(format!("strategy: {e}")))
        .unwrap_or_default();

    for reason in &skipped {
        tracing::warn!(driver_id, %reason, "Analysis skipped");
    }

    DriverReport {
        driver_id: driver_id.to_string(),
        laps: lap_times.len(),
        degradation,
        braking,
        strategies,
        skipped,
    }
}
