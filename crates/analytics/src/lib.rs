//! # Paddock Analytics Engine
//!
//! This crate turns lap times and car telemetry into derived performance metrics:
//! tire degradation, braking behaviour, pit strategy options and lap-time predictions.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data providers
//!   or presentation. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `AnalyticsEngine` holds no state. Every operation is a
//!   synchronous function of its inputs, so results are reproducible bit for bit and
//!   the engine can be called from any number of threads at once.
//! - **Fail Fast:** Statistically invalid input is reported as an `AnalyticsError`. The
//!   engine never substitutes defaults.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The four analytics operations.
//! - `TireDegradationAnalysis`, `BrakingAnalysis`, `StrategyOption`, `PerformancePrediction`:
//!   The result types.
//! - `lap_times_for`: Builds the ordered lap series the degradation fit expects.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod report;
pub mod series;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    BrakingAnalysis, PedalPressureProfile, PerformancePrediction, PerformanceWindow, RiskLevel,
    StrategyOption, TireDegradationAnalysis,
};
pub use series::{drivers_in, lap_times_for};
