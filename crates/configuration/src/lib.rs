use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Logging, ProviderConfig, Providers};

pub const DEFAULT_OPENF1_BASE_URL: &str = "https://api.openf1.org/v1";
pub const DEFAULT_JOLPICA_BASE_URL: &str = "https://api.jolpica.com/api";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub const DEFAULT_HISTORICAL_CUTOFF_YEAR: i64 = 2022;

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by an optional `config.toml` in the working
/// directory, which is in turn overlaid by environment variables of the form
/// `PADDOCK__PROVIDERS__OPENF1__API_KEY`.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = with_defaults()?
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("PADDOCK")
                .prefix_separator("__")
                .separator("__"),
        );

    finish(builder)
}

/// Loads configuration from TOML text layered over the defaults, ignoring the
/// environment.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    finish(with_defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("providers.openf1.base_url", DEFAULT_OPENF1_BASE_URL)?
        .set_default("providers.openf1.timeout", DEFAULT_REQUEST_TIMEOUT)?
        .set_default("providers.jolpica.base_url", DEFAULT_JOLPICA_BASE_URL)?
        .set_default("providers.jolpica.timeout", DEFAULT_REQUEST_TIMEOUT)?
        .set_default("providers.historical_cutoff_year", DEFAULT_HISTORICAL_CUTOFF_YEAR)?
        .set_default("logging.filter", "info")?;
    Ok(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    validate(&config)?;
    tracing::debug!(
        openf1 = %config.providers.openf1.base_url,
        jolpica = %config.providers.jolpica.base_url,
        cutoff = config.providers.historical_cutoff_year,
        "Configuration loaded"
    );
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    for (name, provider) in [
        ("openf1", &config.providers.openf1),
        ("jolpica", &config.providers.jolpica),
    ] {
        let url = provider.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "providers.{name}.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if provider.timeout.is_zero() {
            return Err(ConfigError::ValidationError(format!(
                "providers.{name}.timeout must be greater than zero"
            )));
        }
    }
    Ok(())
}
