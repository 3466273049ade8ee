use crate::workflows::soil_card::OutputFormat;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different deployments of the tool.
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

    /// Filter used when `SOIL_CARD_LOG_LEVEL` is unset. Development shows
    /// per-card debug lines; test runs only surface warnings.
    pub const fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "soil_card=debug,info",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }

    pub const fn timestamps_logs(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("SOIL_CARD_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let directory = match env::var_os("SOIL_CARD_OUTPUT_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_output_dir(),
        };

        let raw_format = env::var("SOIL_CARD_FORMAT").unwrap_or_else(|_| "pdf".to_string());
        let format = OutputFormat::parse(&raw_format)
            .ok_or(ConfigError::InvalidFormat { value: raw_format })?;

        let log_level = env::var("SOIL_CARD_LOG_LEVEL")
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            output: OutputConfig { directory, format },
            telemetry: TelemetryConfig {
                log_level,
                timestamps: environment.timestamps_logs(),
            },
        })
    }
}

/// Where single cards land and which backend renders them.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: OutputFormat,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Prefix each line with a timestamp. Off outside production so CLI
    /// diagnostics stay short.
    pub timestamps: bool,
}

/// `~/Documents` when present, else the home directory, else the working
/// directory.
fn default_output_dir() -> PathBuf {
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from);

    match home {
        Some(home) => {
            let documents = home.join("Documents");
            if documents.is_dir() {
                documents
            } else {
                home
            }
        }
        None => Path::new(".").to_path_buf(),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFormat { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFormat { value } => {
                write!(f, "SOIL_CARD_FORMAT must be 'pdf' or 'json', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
