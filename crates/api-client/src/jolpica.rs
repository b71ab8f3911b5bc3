use crate::error::ApiError;
use crate::http::{build_client, endpoint, get_json};
use crate::responses::{ApiResponse, JolpicaDriver, JolpicaRace, JolpicaResponse, TelemetryRecord};
use crate::DataProvider;
use async_trait::async_trait;
use configuration::ProviderConfig;
use core_types::{Driver, Lap, Race, TelemetrySample};
use serde::de::DeserializeOwned;

/// Client for the Jolpica API, which serves historical seasons (2015-2022).
///
/// Jolpica has no session ids of its own. When used as a `DataProvider`, a
/// session is addressed as `"{year}-{round}"`, the same form as `Race::id`.
#[derive(Debug, Clone)]
pub struct JolpicaClient {
    client: reqwest::Client,
    base_url: String,
}

impl JolpicaClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim().to_string(),
        })
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        let envelope: JolpicaResponse<T> = get_json(&self.client, &url, &[]).await?;
        if envelope.status.eq_ignore_ascii_case("error") {
            return Err(ApiError::InvalidData(format!(
                "Jolpica reported an error for {path} at {}",
                envelope.timestamp
            )));
        }
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self))]
    pub async fn historical_races(&self, year: i32) -> Result<Vec<Race>, ApiError> {
        let raw: Vec<JolpicaRace> = self.get_data(&format!("/races/{year}")).await?;
        raw.into_iter().map(JolpicaRace::into_race).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn race_data(&self, year: i32, round: u32) -> Result<ApiResponse<Race>, ApiError> {
        let raw: JolpicaRace = self.get_data(&format!("/races/{year}/{round}")).await?;
        Ok(ApiResponse::success(raw.into_race()?))
    }

    #[tracing::instrument(skip(self))]
    pub async fn historical_drivers(&self, year: i32) -> Result<Vec<Driver>, ApiError> {
        let raw: Vec<JolpicaDriver> = self.get_data(&format!("/drivers/{year}")).await?;
        raw.into_iter().map(JolpicaDriver::into_driver).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn historical_telemetry(
        &self,
        year: i32,
        round: u32,
        driver_id: &str,
    ) -> Result<Vec<TelemetrySample>, ApiError> {
        let raw: Vec<TelemetryRecord> = self
            .get_data(&format!("/telemetry/{year}/{round}/{driver_id}"))
            .await?;
        raw.into_iter().map(TelemetryRecord::into_sample).collect()
    }
}

/// Splits a `"{year}-{round}"` session id.
pub fn parse_session_id(session_id: &str) -> Result<(i32, u32), ApiError> {
    let invalid = || ApiError::InvalidData(format!("Expected a '<year>-<round>' session id, got '{session_id}'"));
    let (year, round) = session_id.trim().split_once('-').ok_or_else(invalid)?;
    Ok((
        year.parse().map_err(|_| invalid())?,
        round.parse().map_err(|_| invalid())?,
    ))
}

#[async_trait]
impl DataProvider for JolpicaClient {
    fn name(&self) -> &'static str {
        "Jolpica"
    }

    async fn fetch_races(&self, year: i32) -> Result<Vec<Race>, ApiError> {
        self.historical_races(year).await
    }

    async fn fetch_drivers(&self, year: i32) -> Result<Vec<Driver>, ApiError> {
        self.historical_drivers(year).await
    }

    async fn fetch_telemetry(
        &self,
        session_id: &str,
        driver_id: &str,
    ) -> Result<Vec<TelemetrySample>, ApiError> {
        let (year, round) = parse_session_id(session_id)?;
        self.historical_telemetry(year, round, driver_id).await
    }

    async fn fetch_lap_times(&self, _session_id: &str) -> Result<Vec<Lap>, ApiError> {
        Err(ApiError::Unsupported {
            provider: "Jolpica",
            operation: "lap times",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_split_into_year_and_round() {
        assert_eq!(parse_session_id("2021-22").unwrap(), (2021, 22));
        assert!(parse_session_id("2021").is_err());
        assert!(parse_session_id("abc-1").is_err());
        assert!(parse_session_id("2021-x").is_err());
    }
}
