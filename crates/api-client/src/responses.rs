use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{
    CornerValues, Driver, Lap, Race, Session, SessionStatus, SessionType, TelemetrySample,
};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Envelopes
// ==============================================================================

/// The list envelope returned by every OpenF1 endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenF1Response<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageMeta {
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// The envelope returned by every Jolpica endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JolpicaResponse<T> {
    pub status: String,
    pub data: T,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Normalized data stamped with the time it was fetched.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub status: ResponseStatus,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            status: ResponseStatus::Success,
        }
    }
}

// ==============================================================================
// OpenF1 records
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonRecord {
    pub year: i32,
}

/// A race weekend ("meeting") as reported by `GET /races`.
#[derive(Debug, Clone, Deserialize)]
pub struct RaceRecord {
    pub meeting_key: u64,
    pub year: i32,
    pub round: u32,
    pub meeting_name: String,
    pub circuit_short_name: String,
    /// RFC 3339 timestamp of the first session.
    pub date_start: String,
}

impl RaceRecord {
    pub fn into_race(self) -> Result<Race, ApiError> {
        Ok(Race {
            id: self.meeting_key.to_string(),
            year: self.year,
            round: self.round,
            name: self.meeting_name,
            circuit: self.circuit_short_name,
            date: parse_date(&self.date_start)?,
            sessions: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub session_key: u64,
    pub session_type: String,
    pub session_name: String,
    pub date_start: String,
    #[serde(default)]
    pub date_end: Option<String>,
}

impl SessionRecord {
    /// Status is derived from the session's start and end relative to `now`.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, ApiError> {
        let start = parse_timestamp(&self.date_start)?;
        let end = self.date_end.as_deref().map(parse_timestamp).transpose()?;
        let status = match end {
            _ if now < start => SessionStatus::Scheduled,
            Some(end) if now < end => SessionStatus::InProgress,
            _ => SessionStatus::Completed,
        };

        Ok(Session {
            id: self.session_key.to_string(),
            session_type: parse_session_type(&self.session_type)?,
            name: self.session_name,
            date: start.date_naive(),
            status,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverRecord {
    pub driver_number: u32,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub team_name: String,
    /// Hex colour without the leading '#'.
    pub team_colour: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
}

impl From<DriverRecord> for Driver {
    fn from(raw: DriverRecord) -> Self {
        Driver {
            id: raw.driver_number.to_string(),
            number: raw.driver_number,
            name: raw.full_name,
            first_name: raw.first_name,
            last_name: raw.last_name,
            team: raw.team_name,
            team_color: format!("#{}", raw.team_colour.trim_start_matches('#')),
            nationality: raw.country_code.unwrap_or_default(),
            photo: raw.headshot_url,
        }
    }
}

/// A lap as reported by `GET /laps`. Durations are in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct LapRecord {
    pub session_key: u64,
    pub driver_number: u32,
    pub lap_number: u32,
    #[serde(default)]
    pub lap_duration: Option<f64>,
    #[serde(default)]
    pub duration_sector_1: Option<f64>,
    #[serde(default)]
    pub duration_sector_2: Option<f64>,
    #[serde(default)]
    pub duration_sector_3: Option<f64>,
}

impl LapRecord {
    /// Converts to a `Lap` in milliseconds. Laps without a recorded duration
    /// (e.g. aborted laps) yield `None`.
    pub fn into_lap(self) -> Result<Option<Lap>, ApiError> {
        let Some(duration) = self.lap_duration else {
            return Ok(None);
        };
        let lap = Lap {
            id: format!("{}-{}-{}", self.session_key, self.driver_number, self.lap_number),
            number: self.lap_number,
            driver_id: self.driver_number.to_string(),
            session_id: self.session_key.to_string(),
            time: duration * 1000.0,
            sector1: self.duration_sector_1.unwrap_or_default() * 1000.0,
            sector2: self.duration_sector_2.unwrap_or_default() * 1000.0,
            sector3: self.duration_sector_3.unwrap_or_default() * 1000.0,
            is_personal_best: false,
            is_session_best: false,
        };
        lap.validate()?;
        Ok(Some(lap))
    }
}

/// Flags each driver's fastest lap and the overall fastest lap of the session.
pub fn mark_best_laps(laps: &mut [Lap]) {
    let session_best = laps.iter().map(|l| l.time).reduce(f64::min);
    let mut personal_best: Vec<(String, f64)> = Vec::new();
    for lap in laps.iter() {
        match personal_best.iter_mut().find(|(id, _)| id == &lap.driver_id) {
            Some((_, best)) => *best = best.min(lap.time),
            None => personal_best.push((lap.driver_id.clone(), lap.time)),
        }
    }

    for lap in laps.iter_mut() {
        lap.is_session_best = Some(lap.time) == session_best;
        lap.is_personal_best = personal_best
            .iter()
            .any(|(id, best)| id == &lap.driver_id && *best == lap.time);
    }
}

/// A telemetry sample, shared by both providers.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: f64,
    pub lap_number: u32,
    pub distance: f64,
    pub throttle: f64,
    pub brake: f64,
    pub speed: f64,
    pub rpm: u32,
    pub n_gear: i8,
    /// DRS state code; 10 and above means the flap is open.
    #[serde(default)]
    pub drs: u8,
    pub brake_temp: f64,
    #[serde(default)]
    pub tire_temp: Option<CornerValues>,
    #[serde(default)]
    pub tire_pressure: Option<CornerValues>,
    #[serde(default)]
    pub lateral_acceleration: Option<f64>,
    #[serde(default)]
    pub longitudinal_acceleration: Option<f64>,
}

const DRS_OPEN_THRESHOLD: u8 = 10;

impl TelemetryRecord {
    pub fn into_sample(self) -> Result<TelemetrySample, ApiError> {
        let sample = TelemetrySample {
            timestamp: self.timestamp,
            lap_number: self.lap_number,
            distance: self.distance,
            throttle: self.throttle,
            brake: self.brake,
            speed: self.speed,
            rpm: self.rpm,
            gear: self.n_gear,
            drs_active: self.drs >= DRS_OPEN_THRESHOLD,
            brake_temp: self.brake_temp,
            tire_temp: self.tire_temp.unwrap_or_default(),
            tire_pressure: self.tire_pressure.unwrap_or_default(),
            lateral_acceleration: self.lateral_acceleration.unwrap_or_default(),
            longitudinal_acceleration: self.longitudinal_acceleration.unwrap_or_default(),
        };
        sample.validate()?;
        Ok(sample)
    }
}

// ==============================================================================
// Jolpica records
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JolpicaRace {
    pub season: String,
    pub round: String,
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: JolpicaCircuit,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JolpicaCircuit {
    pub circuit_id: String,
    pub circuit_name: String,
}

impl JolpicaRace {
    pub fn into_race(self) -> Result<Race, ApiError> {
        let year = parse_number::<i32>("season", &self.season)?;
        let round = parse_number::<u32>("round", &self.round)?;
        Ok(Race {
            id: format!("{year}-{round}"),
            year,
            round,
            name: self.race_name,
            circuit: self.circuit.circuit_name,
            date: self.date,
            sessions: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JolpicaDriver {
    pub driver_id: String,
    #[serde(default)]
    pub permanent_number: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub nationality: String,
    #[serde(default)]
    pub constructor_name: Option<String>,
}

impl JolpicaDriver {
    pub fn into_driver(self) -> Result<Driver, ApiError> {
        let number = self
            .permanent_number
            .as_deref()
            .map(|n| parse_number::<u32>("permanentNumber", n))
            .transpose()?
            .unwrap_or_default();
        Ok(Driver {
            name: format!("{} {}", self.given_name, self.family_name),
            id: self.driver_id,
            number,
            first_name: self.given_name,
            last_name: self.family_name,
            team: self.constructor_name.unwrap_or_default(),
            team_color: String::new(),
            nationality: self.nationality,
            photo: None,
        })
    }
}

// ==============================================================================
// Parsing helpers
// ==============================================================================

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::InvalidData(format!("Invalid timestamp '{value}': {e}")))
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    parse_timestamp(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|e| ApiError::InvalidData(format!("Invalid date '{value}': {e}")))
        })
}

fn parse_session_type(value: &str) -> Result<SessionType, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "practice" => Ok(SessionType::Practice),
        "qualifying" | "sprint qualifying" | "sprint shootout" => Ok(SessionType::Qualifying),
        "sprint" => Ok(SessionType::Sprint),
        "race" => Ok(SessionType::Race),
        other => Err(ApiError::InvalidData(format!("Unknown session type '{other}'"))),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidData(format!("Field '{field}' is not a number: '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lap_record(driver: u32, number: u32, seconds: Option<f64>) -> LapRecord {
        LapRecord {
            session_key: 9158,
            driver_number: driver,
            lap_number: number,
            lap_duration: seconds,
            duration_sector_1: Some(30.0),
            duration_sector_2: None,
            duration_sector_3: None,
        }
    }

    #[test]
    fn lap_durations_are_converted_to_milliseconds() {
        let lap = lap_record(1, 5, Some(91.25)).into_lap().unwrap().unwrap();
        assert_eq!(lap.time, 91_250.0);
        assert_eq!(lap.sector1, 30_000.0);
        assert_eq!(lap.sector2, 0.0);
        assert_eq!(lap.driver_id, "1");
        assert_eq!(lap.session_id, "9158");
    }

    #[test]
    fn laps_without_duration_are_skipped() {
        assert!(lap_record(1, 1, None).into_lap().unwrap().is_none());
    }

    #[test]
    fn zero_lap_number_is_rejected_at_the_boundary() {
        let err = lap_record(1, 0, Some(90.0)).into_lap().unwrap_err();
        assert!(matches!(err, ApiError::InvalidRecord(_)));
    }

    #[test]
    fn best_laps_are_flagged() {
        let mut laps: Vec<Lap> = [
            lap_record(1, 1, Some(92.0)),
            lap_record(1, 2, Some(91.0)),
            lap_record(44, 1, Some(90.5)),
            lap_record(44, 2, Some(93.0)),
        ]
        .into_iter()
        .filter_map(|r| r.into_lap().unwrap())
        .collect();
        mark_best_laps(&mut laps);

        let flags: Vec<(bool, bool)> = laps
            .iter()
            .map(|l| (l.is_personal_best, l.is_session_best))
            .collect();
        assert_eq!(flags, vec![(false, false), (true, false), (true, true), (false, false)]);
    }

    #[test]
    fn session_status_follows_the_clock() {
        let record = SessionRecord {
            session_key: 1,
            session_type: "Race".to_string(),
            session_name: "Race".to_string(),
            date_start: "2024-03-02T15:00:00+00:00".to_string(),
            date_end: Some("2024-03-02T17:00:00+00:00".to_string()),
        };
        let at = |h| Utc.with_ymd_and_hms(2024, 3, 2, h, 0, 0).unwrap();
        assert_eq!(record.clone().into_session(at(14)).unwrap().status, SessionStatus::Scheduled);
        assert_eq!(record.clone().into_session(at(16)).unwrap().status, SessionStatus::InProgress);
        assert_eq!(record.into_session(at(18)).unwrap().status, SessionStatus::Completed);
    }

    #[test]
    fn telemetry_drs_code_maps_to_flag() {
        let record: TelemetryRecord = serde_json::from_str(
            r#"{"timestamp":10,"lap_number":2,"distance":450,"throttle":100,"brake":0,
                "speed":320,"rpm":11900,"n_gear":8,"drs":12,"brake_temp":380}"#,
        )
        .unwrap();
        let sample = record.into_sample().unwrap();
        assert!(sample.drs_active);
        assert_eq!(sample.gear, 8);
    }

    #[test]
    fn jolpica_race_ids_combine_season_and_round() {
        let raw: JolpicaRace = serde_json::from_str(
            r#"{"season":"2021","round":"22","raceName":"Abu Dhabi Grand Prix",
                "Circuit":{"circuitId":"yas_marina","circuitName":"Yas Marina Circuit"},
                "date":"2021-12-12"}"#,
        )
        .unwrap();
        let race = raw.into_race().unwrap();
        assert_eq!(race.id, "2021-22");
        assert_eq!(race.circuit, "Yas Marina Circuit");
    }

    #[test]
    fn race_dates_accept_plain_dates_and_timestamps() {
        assert_eq!(
            parse_date("2023-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()
        );
        assert_eq!(
            parse_date("2023-03-05T15:00:00+00:00").unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()
        );
        assert!(parse_date("next sunday").is_err());
    }
}
