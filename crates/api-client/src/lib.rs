//! Data providers for race, driver, lap and telemetry records.
//!
//! Both upstream APIs return loosely shaped JSON. Everything is converted and
//! validated into `core-types` records here, so the analytics layer never sees
//! raw provider data.

use crate::error::ApiError;
use async_trait::async_trait;
use configuration::Providers;
use core_types::{Driver, Lap, Race, TelemetrySample};

pub mod error;
mod http;
pub mod jolpica;
pub mod openf1;
pub mod responses;

// --- Public API ---
pub use jolpica::JolpicaClient;
pub use openf1::OpenF1Client;
pub use responses::{ApiResponse, ResponseStatus};

/// The abstract interface for a race data source.
///
/// The CLI only depends on this trait, allowing the live and historical
/// clients (or a mock in tests) to be swapped freely.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch_races(&self, year: i32) -> Result<Vec<Race>, ApiError>;

    async fn fetch_drivers(&self, year: i32) -> Result<Vec<Driver>, ApiError>;

    async fn fetch_telemetry(
        &self,
        session_id: &str,
        driver_id: &str,
    ) -> Result<Vec<TelemetrySample>, ApiError>;

    async fn fetch_lap_times(&self, session_id: &str) -> Result<Vec<Lap>, ApiError>;
}

/// Both providers, routed by season.
#[derive(Debug, Clone)]
pub struct ProviderSet {
    live: OpenF1Client,
    historical: JolpicaClient,
    historical_cutoff_year: i32,
}

impl ProviderSet {
    pub fn new(config: &Providers) -> Result<Self, ApiError> {
        Ok(Self {
            live: OpenF1Client::new(&config.openf1)?,
            historical: JolpicaClient::new(&config.jolpica)?,
            historical_cutoff_year: config.historical_cutoff_year,
        })
    }

    /// The historical provider for seasons up to the cutoff, the live one after.
    pub fn for_season(&self, year: i32) -> &dyn DataProvider {
        if year <= self.historical_cutoff_year {
            &self.historical
        } else {
            &self.live
        }
    }

    pub fn live(&self) -> &OpenF1Client {
        &self.live
    }

    pub fn historical(&self) -> &JolpicaClient {
        &self.historical
    }
}
