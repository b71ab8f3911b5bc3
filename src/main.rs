use analytics::AnalyticsEngine;
use anyhow::Context;
use api_client::ProviderSet;
use clap::{Parser, Subcommand};
use configuration::Logging;
use core_types::{TelemetrySample, TireCompound};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod session;

use session::{SessionRequest, analyze_session};

/// The main entry point for the Paddock race analytics tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provider API keys may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = configuration::load_config().context("failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging)?;
    let engine = AnalyticsEngine::new();

    match cli.command {
        Commands::Degradation(args) => {
            let analysis = engine.tire_degradation(&args.laps, args.compound)?;
            if cli.json {
                render::print_json(&analysis)?;
            } else {
                println!("{}", render::degradation_table(&analysis));
            }
        }
        Commands::Braking(args) => {
            let samples = read_telemetry(&args.telemetry)?;
            let analysis = engine.braking(&samples, &args.driver)?;
            if cli.json {
                render::print_json(&analysis)?;
            } else {
                println!("{}", render::braking_table(&analysis));
            }
        }
        Commands::Strategy(args) => {
            let options = engine.strategy_options(&args.laps, args.total_laps)?;
            if cli.json {
                render::print_json(&options)?;
            } else {
                println!("{}", render::strategy_table(&options));
            }
        }
        Commands::Predict(args) => {
            let prediction = engine.predict_lap_time(args.lap_time, args.fuel, args.tire_age);
            if cli.json {
                render::print_json(&prediction)?;
            } else {
                println!("{}", render::prediction_table(&prediction));
            }
        }
        Commands::Seasons => {
            let providers = ProviderSet::new(&config.providers)?;
            let seasons = providers.live().seasons().await?;
            if cli.json {
                render::print_json(&seasons)?;
            } else {
                for year in seasons {
                    println!("{year}");
                }
            }
        }
        Commands::Races(args) => {
            let providers = ProviderSet::new(&config.providers)?;
            let races = providers
                .for_season(args.year)
                .fetch_races(args.year)
                .await
                .with_context(|| format!("failed to fetch races for {}", args.year))?;
            if cli.json {
                render::print_json(&races)?;
            } else {
                println!("{}", render::races_table(&races));
            }
        }
        Commands::Session(args) => {
            let providers = ProviderSet::new(&config.providers)?;
            let report = analyze_session(
                &providers,
                SessionRequest {
                    year: args.year,
                    session_id: args.session,
                    driver_ids: args.drivers,
                    compound: args.compound,
                    total_laps: args.total_laps,
                },
            )
            .await?;

            if cli.json {
                render::print_json(&report)?;
            } else {
                for driver in &report.drivers {
                    println!("\nDriver {} ({} laps)", driver.driver_id, driver.laps);
                    if let Some(analysis) = &driver.degradation {
                        println!("{}", render::degradation_table(analysis));
                    }
                    if let Some(analysis) = &driver.braking {
                        println!("{}", render::braking_table(analysis));
                    }
                    if !driver.strategies.is_empty() {
                        println!("{}", render::strategy_table(&driver.strategies));
                    }
                    for reason in &driver.skipped {
                        println!("  skipped {reason}");
                    }
                }
                render::print_summary(&report.summary);
            }
        }
    }

    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
///
/// The returned guard must be held for the life of the program so buffered
/// file output is flushed.
fn init_tracing(logging: &Logging) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "paddock.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}

fn read_telemetry(path: &Path) -> anyhow::Result<Vec<TelemetrySample>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let samples: Vec<TelemetrySample> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of telemetry samples", path.display()))?;
    for (i, sample) in samples.iter().enumerate() {
        sample
            .validate()
            .with_context(|| format!("sample {i} in {}", path.display()))?;
    }
    Ok(samples)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Formula 1 telemetry and race analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a tire degradation line through a stint's lap times.
    Degradation(DegradationArgs),
    /// Summarise braking events from a telemetry JSON file.
    Braking(BrakingArgs),
    /// Generate one-stop and two-stop strategy options.
    Strategy(StrategyArgs),
    /// Predict a lap time from fuel load and tire age.
    Predict(PredictArgs),
    /// List the seasons known to the live provider.
    Seasons,
    /// List the races of a season.
    Races(RacesArgs),
    /// Fetch a session and run every analysis for its drivers.
    Session(SessionArgs),
}

#[derive(Parser)]
struct DegradationArgs {
    /// Lap times in milliseconds, in lap order (e.g. "91200,91350,91420").
    #[arg(long, value_delimiter = ',', required = true)]
    laps: Vec<f64>,

    /// The compound the stint was run on (SOFT, MEDIUM, HARD, INTERMEDIATE, WET).
    #[arg(long)]
    compound: TireCompound,
}

#[derive(Parser)]
struct BrakingArgs {
    /// Path to a JSON array of telemetry samples.
    #[arg(long)]
    telemetry: PathBuf,

    #[arg(long)]
    driver: String,
}

#[derive(Parser)]
struct StrategyArgs {
    /// Lap times in milliseconds.
    #[arg(long, value_delimiter = ',', required = true)]
    laps: Vec<f64>,

    /// Race distance in laps.
    #[arg(long)]
    total_laps: u32,
}

#[derive(Parser)]
struct PredictArgs {
    /// Current lap time in milliseconds.
    #[arg(long)]
    lap_time: f64,

    /// Fuel load as a percentage of a full tank.
    #[arg(long, allow_negative_numbers = true)]
    fuel: f64,

    /// Tire age in laps.
    #[arg(long, allow_negative_numbers = true)]
    tire_age: f64,
}

#[derive(Parser)]
struct RacesArgs {
    #[arg(long)]
    year: i32,
}

#[derive(Parser)]
struct SessionArgs {
    #[arg(long)]
    year: i32,

    /// Provider session id. Historical sessions use "<year>-<round>".
    #[arg(long)]
    session: String,

    /// Driver ids to analyse. Defaults to every driver with laps in the session.
    #[arg(long, value_delimiter = ',')]
    drivers: Vec<String>,

    /// Compound assumed for the degradation fit.
    #[arg(long, default_value = "MEDIUM")]
    compound: TireCompound,

    /// Race distance for strategy options. Defaults to the longest lap count in the session.
    #[arg(long)]
    total_laps: Option<u32>,
}
