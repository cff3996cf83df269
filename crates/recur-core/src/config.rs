use anyhow::Result;
use config::{Config, ConfigBuilder, FileFormat, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, ENV_PREFIX, UTC_TZID};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub recurrence: RecurrenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Zone used to interpret zone-less RDATE/EXDATE values when the caller
    /// does not supply one.
    pub default_tzid: String,
    /// Fail compilation on the first malformed content line instead of
    /// skipping it.
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            default_tzid: UTC_TZID.to_string(),
            strict: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `recur.toml` in the working directory.
    /// Environment variables (`RECUR_RECURRENCE__STRICT=true`) take precedence
    /// over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        tracing::debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    /// ## Summary
    /// Loads configuration from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML, does not match the
    /// settings shape, or fails validation.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("recurrence.default_tzid", UTC_TZID)?
            .set_default("recurrence.strict", false)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?)
    }

    /// ## Summary
    /// Checks values that deserialize cleanly but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the default zone identifier is
    /// empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.recurrence.default_tzid.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "recurrence.default_tzid must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
