use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::bulk::BulkSourceError;
use crate::workflows::soil_card::CardError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Record(serde_json::Error),
    Card(CardError),
    Bulk(BulkSourceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Record(err) => write!(f, "invalid soil record: {}", err),
            AppError::Card(err) => write!(f, "could not generate card: {}", err),
            AppError::Bulk(err) => write!(f, "bulk generation aborted: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Record(err) => Some(err),
            AppError::Card(err) => Some(err),
            AppError::Bulk(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Record(value)
    }
}

impl From<CardError> for AppError {
    fn from(value: CardError) -> Self {
        Self::Card(value)
    }
}

impl From<BulkSourceError> for AppError {
    fn from(value: BulkSourceError) -> Self {
        Self::Bulk(value)
    }
}
