//! Crate-level errors.
//!
//! Provider failures are not represented here: they are [`Failure`](crate::failure::Failure)
//! values that get classified into a [`ProgressResult`](crate::progress::ProgressResult).
//! This enum only covers misuse of the core itself, such as loading an invalid
//! configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerCoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HandlerCoreError {
    fn from(error: serde_json::Error) -> Self {
        HandlerCoreError::Serialization(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for HandlerCoreError {
    fn from(error: config::ConfigError) -> Self {
        HandlerCoreError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandlerCoreError>;
