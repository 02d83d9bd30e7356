//! [`Config`]-related definitions.

use std::{path::PathBuf, time::Duration};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::{de, Deserialize, Deserializer};
use service::{infra::device::Quality, workflow::capture};
use smart_default::SmartDefault;
use time::{
    macros::{format_description, offset},
    UtcOffset,
};

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration.
    pub backend: Backend,

    /// Store configuration.
    pub store: Store,

    /// Capture configuration.
    pub capture: Capture,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Backend {
    /// Base URL of the backend REST API.
    #[default("http://localhost:8080/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single request to the backend.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl From<Backend> for service::infra::backend::http::Config {
    fn from(value: Backend) -> Self {
        let Backend { base_url, timeout } = value;
        Self { base_url, timeout }
    }
}

/// Store configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Store {
    /// Path to the file persisting the session.
    #[default(".attendance/session.json".into())]
    pub path: PathBuf,
}

/// Capture configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Capture {
    /// Compression quality of the captured photos, within `0..=1`.
    pub photo_quality: Quality,

    /// UTC offset the calendar days and times are observed at.
    #[default(offset!(+7))]
    #[serde(deserialize_with = "deserialize_offset")]
    pub utc_offset: UtcOffset,
}

impl From<Capture> for capture::Config {
    fn from(value: Capture) -> Self {
        let Capture {
            photo_quality,
            utc_offset,
        } = value;
        Self {
            photo_quality,
            display_offset: utc_offset,
        }
    }
}

impl From<Capture> for service::Config {
    fn from(value: Capture) -> Self {
        Self {
            utc_offset: value.utc_offset,
        }
    }
}

/// Deserializes an [`UtcOffset`] from a `+HH:MM` string.
fn deserialize_offset<'de, D>(d: D) -> Result<UtcOffset, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    UtcOffset::parse(
        &raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| de::Error::custom(format!("invalid UTC offset `{raw}`: {e}")))
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    Info,

    /// Designates hazardous situations.
    #[default]
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{io::Write as _, time::Duration};

    use time::macros::offset;

    use super::{Config, LogLevel};

    #[test]
    fn defaults_without_file() {
        let conf = Config::new("/nonexistent/attendance.toml").unwrap();

        assert_eq!(conf.backend.base_url, "http://localhost:8080/api");
        assert_eq!(conf.backend.timeout, None);
        assert_eq!(conf.capture.utc_offset, offset!(+7));
        assert!((conf.capture.photo_quality.get() - 0.5).abs() < f32::EPSILON);
        assert!(matches!(conf.log.level, LogLevel::Warn));
    }

    #[test]
    fn loads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [backend]
            base_url = "https://hr.example.com/api"
            timeout = "15s"

            [store]
            path = "/tmp/session.json"

            [capture]
            photo_quality = 0.8
            utc_offset = "+08:00"

            [log]
            level = "DEBUG"
            "#,
        )
        .unwrap();

        let conf = Config::new(file.path().to_str().unwrap()).unwrap();

        assert_eq!(conf.backend.base_url, "https://hr.example.com/api");
        assert_eq!(conf.backend.timeout, Some(Duration::from_secs(15)));
        assert_eq!(conf.store.path.to_str(), Some("/tmp/session.json"));
        assert_eq!(conf.capture.utc_offset, offset!(+8));
        assert!(matches!(conf.log.level, LogLevel::Debug));
    }

    #[test]
    fn fills_missing_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[backend]\nbase_url = \"https://hr.example.com/api\"")
            .unwrap();

        let conf = Config::new(file.path().to_str().unwrap()).unwrap();

        assert_eq!(conf.backend.base_url, "https://hr.example.com/api");
        assert_eq!(conf.store.path.to_str(), Some(".attendance/session.json"));
        assert_eq!(conf.capture.utc_offset, offset!(+7));
        assert!(matches!(conf.log.level, LogLevel::Warn));
    }

    #[test]
    fn rejects_invalid_quality() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[capture]\nphoto_quality = 1.5").unwrap();

        assert!(Config::new(file.path().to_str().unwrap()).is_err());
    }
}
