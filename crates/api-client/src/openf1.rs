use crate::error::ApiError;
use crate::http::{build_client, endpoint, get_json};
use crate::responses::{
    ApiResponse, DriverRecord, LapRecord, OpenF1Response, RaceRecord, SeasonRecord, SessionRecord,
    TelemetryRecord, mark_best_laps,
};
use crate::DataProvider;
use async_trait::async_trait;
use chrono::Utc;
use configuration::ProviderConfig;
use core_types::{Driver, Lap, Race, Session, TelemetrySample};
use serde::de::DeserializeOwned;

/// Client for the OpenF1 API, which serves the current and recent seasons.
#[derive(Debug, Clone)]
pub struct OpenF1Client {
    client: reqwest::Client,
    base_url: String,
}

impl OpenF1Client {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim().to_string(),
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let url = endpoint(&self.base_url, path);
        let envelope: OpenF1Response<T> = get_json(&self.client, &url, query).await?;
        if let Some(meta) = envelope.meta {
            tracing::debug!(path, count = meta.count, offset = meta.offset, limit = meta.limit, "OpenF1 page");
        }
        Ok(envelope.data)
    }

    /// All seasons the API knows about, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn seasons(&self) -> Result<Vec<i32>, ApiError> {
        let records: Vec<SeasonRecord> = self.get_list("/seasons", &[]).await?;
        let mut years: Vec<i32> = records.into_iter().map(|s| s.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    #[tracing::instrument(skip(self))]
    pub async fn races(&self, year: i32) -> Result<Vec<Race>, ApiError> {
        let records: Vec<RaceRecord> = self
            .get_list("/races", &[("year", year.to_string())])
            .await?;
        records.into_iter().map(RaceRecord::into_race).collect()
    }

    /// Same as `races`, wrapped in a timestamped envelope.
    pub async fn races_response(&self, year: i32) -> Result<ApiResponse<Vec<Race>>, ApiError> {
        Ok(ApiResponse::success(self.races(year).await?))
    }

    #[tracing::instrument(skip(self))]
    pub async fn sessions(
        &self,
        year: i32,
        round: u32,
        session_type: &str,
    ) -> Result<Vec<Session>, ApiError> {
        let records: Vec<SessionRecord> = self
            .get_list(
                "/sessions",
                &[
                    ("year", year.to_string()),
                    ("round", round.to_string()),
                    ("session_type", session_type.to_string()),
                ],
            )
            .await?;
        let now = Utc::now();
        records.into_iter().map(|r| r.into_session(now)).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn drivers(&self, year: i32) -> Result<Vec<Driver>, ApiError> {
        let records: Vec<DriverRecord> = self
            .get_list("/drivers", &[("year", year.to_string())])
            .await?;
        Ok(records.into_iter().map(Driver::from).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn telemetry(
        &self,
        session_id: &str,
        driver_id: &str,
    ) -> Result<Vec<TelemetrySample>, ApiError> {
        let records: Vec<TelemetryRecord> = self
            .get_list(
                "/telemetry",
                &[
                    ("session_id", session_id.to_string()),
                    ("driver_id", driver_id.to_string()),
                ],
            )
            .await?;
        records.into_iter().map(TelemetryRecord::into_sample).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn lap_times(&self, session_id: &str) -> Result<Vec<Lap>, ApiError> {
        let records: Vec<LapRecord> = self
            .get_list("/laps", &[("session_id", session_id.to_string())])
            .await?;
        let total = records.len();

        let mut laps = Vec::with_capacity(total);
        for record in records {
            if let Some(lap) = record.into_lap()? {
                laps.push(lap);
            }
        }
        if laps.len() < total {
            tracing::debug!(skipped = total - laps.len(), "Dropped laps without a recorded duration");
        }

        mark_best_laps(&mut laps);
        Ok(laps)
    }
}

#[async_trait]
impl DataProvider for OpenF1Client {
    fn name(&self) -> &'static str {
        "OpenF1"
    }

    async fn fetch_races(&self, year: i32) -> Result<Vec<Race>, ApiError> {
        self.races(year).await
    }

    async fn fetch_drivers(&self, year: i32) -> Result<Vec<Driver>, ApiError> {
        self.drivers(year).await
    }

    async fn fetch_telemetry(
        &self,
        session_id: &str,
        driver_id: &str,
    ) -> Result<Vec<TelemetrySample>, ApiError> {
        self.telemetry(session_id, driver_id).await
    }

    async fn fetch_lap_times(&self, session_id: &str) -> Result<Vec<Lap>, ApiError> {
        self.lap_times(session_id).await
    }
}
