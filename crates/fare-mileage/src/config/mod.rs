use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::routing::MAX_PERMITTED_SURCHARGE;

/// Highest surcharge tier; a configured maximum above it is meaningless.
const SURCHARGE_CEILING: u16 = 30;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the validator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub validation: ValidationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("MILEAGE_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let max_permitted_surcharge = match env::var("MILEAGE_MAX_PERMITTED_SURCHARGE") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|max| *max <= SURCHARGE_CEILING)
                .ok_or(ConfigError::InvalidSurcharge { value })?,
            Err(_) => MAX_PERMITTED_SURCHARGE,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_writer = match env::var("APP_LOG_WRITER") {
            Ok(value) => LogWriter::parse(&value).ok_or(ConfigError::InvalidLogWriter { value })?,
            Err(_) => LogWriter::Stderr,
        };

        let log_targets = env::var("APP_LOG_TARGETS")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            environment,
            data: DataConfig {
                data_dir: PathBuf::from(data_dir),
            },
            validation: ValidationConfig {
                max_permitted_surcharge,
            },
            telemetry: TelemetryConfig {
                log_level,
                log_writer,
                log_targets,
            },
        })
    }
}

/// Location of the reference data files.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_permitted_surcharge: u16,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_writer: LogWriter,
    /// Print the module path of each event.
    pub log_targets: bool,
}

/// Stream the log lines go to. The CLI prints its reports on stdout, so
/// stderr is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWriter {
    Stderr,
    Stdout,
}

impl LogWriter {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stderr" => Some(Self::Stderr),
            "stdout" => Some(Self::Stdout),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSurcharge { value: String },
    InvalidLogWriter { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSurcharge { value } => write!(
                f,
                "MILEAGE_MAX_PERMITTED_SURCHARGE must be a percentage between 0 and {} (got '{}')",
                SURCHARGE_CEILING, value
            ),
            ConfigError::InvalidLogWriter { value } => {
                write!(f, "APP_LOG_WRITER must be 'stderr' or 'stdout' (got '{}')", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
