//! Prose summaries of a race, written from structured analytics.
//!
//! `SummaryGenerator` is the seam for a text-generation backend. `TemplateNarrator`
//! is the built-in implementation.

use crate::error::NarratorError;
use async_trait::async_trait;
use core_types::{Driver, Lap};

pub mod error;
pub mod summary;
pub mod template;

pub use summary::{DriverAnalysis, DriverAssessment, DriverInsight, RaceSummary, SummaryInput};
pub use template::TemplateNarrator;

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn race_summary(
        &self,
        race_id: &str,
        drivers: &[Driver],
        input: &SummaryInput,
    ) -> Result<RaceSummary, NarratorError>;

    async fn driver_profile(
        &self,
        driver_id: &str,
        laps: &[Lap],
    ) -> Result<DriverInsight, NarratorError>;
}

/// Formats milliseconds as `m:ss.mmm`, or `h:mm:ss.mmm` from an hour up.
pub fn format_lap_time(ms: f64) -> String {
    let sign = if ms < 0.0 { "-" } else { "" };
    let total_ms = ms.abs().round() as u64;
    let (hours, rem) = (total_ms / 3_600_000, total_ms % 3_600_000);
    let (minutes, rem) = (rem / 60_000, rem % 60_000);
    let (seconds, millis) = (rem / 1_000, rem % 1_000);

    if hours > 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{sign}{minutes}:{seconds:02}.{millis:03}")
    }
}
