use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub providers: Providers,
    pub logging: Logging,
}

/// Settings for the two upstream data sources.
#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
    /// Live and current-season data (2023 onward).
    pub openf1: ProviderConfig,
    /// Historical data (2015-2022).
    pub jolpica: ProviderConfig,
    /// Seasons up to and including this year are served by the historical provider.
    pub historical_cutoff_year: i32,
}

/// Connection parameters for a single REST data provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Sent as the `X-API-Key` header when present.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Upper bound on a single request, e.g. "10s".
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl ProviderConfig {
    /// The API key, ignoring keys that are set but blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Contains parameters for log output.
#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// An `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
