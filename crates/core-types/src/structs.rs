use crate::enums::{SessionStatus, SessionType};
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single Grand Prix weekend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    pub year: i32,
    pub round: u32,
    pub name: String,
    pub circuit: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub session_type: SessionType,
    pub name: String,
    pub date: NaiveDate,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub team_color: String,
    pub nationality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// One completed lap. All times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub id: String,
    /// 1-based lap number within the session.
    pub number: u32,
    pub driver_id: String,
    pub session_id: String,
    pub time: f64,
    pub sector1: f64,
    pub sector2: f64,
    pub sector3: f64,
    #[serde(default)]
    pub is_personal_best: bool,
    #[serde(default)]
    pub is_session_best: bool,
}

impl Lap {
    /// Checks the field-level contract the analytics layer relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.number == 0 {
            return Err(CoreError::OutOfRange {
                field: "lap.number",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if !self.time.is_finite() || self.time <= 0.0 {
            return Err(CoreError::OutOfRange {
                field: "lap.time",
                value: self.time,
                expected: "a positive duration in ms",
            });
        }
        Ok(())
    }
}

/// A value measured at each of the four wheels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerValues {
    pub fl: f64,
    pub fr: f64,
    pub rl: f64,
    pub rr: f64,
}

/// A point-in-time car telemetry record. Many samples make up one lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    /// Milliseconds since session start.
    pub timestamp: f64,
    pub lap_number: u32,
    /// Meters travelled since the start of the lap.
    pub distance: f64,
    /// Throttle pedal, 0-100 %.
    pub throttle: f64,
    /// Brake pedal, 0-100 %.
    pub brake: f64,
    /// km/h
    pub speed: f64,
    pub rpm: u32,
    pub gear: i8,
    pub drs_active: bool,
    /// Celsius
    pub brake_temp: f64,
    #[serde(default)]
    pub tire_temp: CornerValues,
    #[serde(default)]
    pub tire_pressure: CornerValues,
    #[serde(default)]
    pub lateral_acceleration: f64,
    #[serde(default)]
    pub longitudinal_acceleration: f64,
}

impl TelemetrySample {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_percentage("telemetry.brake", self.brake)?;
        check_percentage("telemetry.throttle", self.throttle)?;
        if !self.distance.is_finite() {
            return Err(CoreError::OutOfRange {
                field: "telemetry.distance",
                value: self.distance,
                expected: "a finite distance in meters",
            });
        }
        Ok(())
    }
}

fn check_percentage(field: &'static str, value: f64) -> Result<(), CoreError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange {
            field,
            value,
            expected: "0-100",
        })
    }
}
