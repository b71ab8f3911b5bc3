use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("Regression is undefined for the given lap series: {0}")]
    DegenerateRegression(String),

    #[error("No braking data found: no sample exceeds {threshold}% brake pressure")]
    NoBrakingData { threshold: f64 },

    #[error("Empty input: '{0}' must contain at least one element")]
    EmptyInput(&'static str),
}
