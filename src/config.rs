//! # Handler Configuration
//!
//! Layered configuration for the stabilization backoff and the probing
//! debouncer. Sources are merged in order, later sources winning:
//!
//! 1. built-in defaults ([`HandlerConfig::default`])
//! 2. an optional file (YAML, TOML or JSON, picked by extension)
//! 3. environment variables prefixed `HANDLER_`, nested with `__`
//!    (`HANDLER_BACKOFF__TOTAL_TIMEOUT_SECONDS=30`)
//!
//! Nothing in this crate reads configuration on its own; callers load a
//! [`HandlerConfig`] and hand the derived values to the core.

use crate::error::{HandlerCoreError, Result};
use crate::probing::ProbingContext;
use crate::stabilization::BackoffPolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Prefix of environment variables read by [`HandlerConfig::load`]
pub const ENV_PREFIX: &str = "HANDLER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub backoff: BackoffConfig,
    #[serde(default)]
    pub probing: ProbingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    #[default]
    Constant,
    Exponential,
}

/// Stabilization backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    pub initial_delay_seconds: u64,
    pub total_timeout_seconds: u64,
    #[serde(default)]
    pub strategy: BackoffStrategy,
    /// Only read for the exponential strategy
    pub multiplier: f64,
    /// Only read for the exponential strategy
    pub max_delay_seconds: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_seconds: 5,
            total_timeout_seconds: 600,
            strategy: BackoffStrategy::Constant,
            multiplier: 2.0,
            max_delay_seconds: 60,
        }
    }
}

impl BackoffConfig {
    pub fn to_policy(&self) -> BackoffPolicy {
        let initial = Duration::from_secs(self.initial_delay_seconds);
        let total = Duration::from_secs(self.total_timeout_seconds);
        match self.strategy {
            BackoffStrategy::Constant => BackoffPolicy::new(initial, total),
            BackoffStrategy::Exponential => BackoffPolicy::exponential(
                initial,
                total,
                self.multiplier,
                Duration::from_secs(self.max_delay_seconds),
            ),
        }
    }
}

/// Probing debouncer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbingConfig {
    pub enabled: bool,
    pub threshold: u32,
}

impl Default for ProbingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 3,
        }
    }
}

impl ProbingConfig {
    /// Fresh probing context for a new operation
    pub fn context(&self) -> ProbingContext {
        ProbingContext::new(self.enabled)
    }
}

impl HandlerConfig {
    /// Load defaults, then `path` if given, then `HANDLER_*` environment
    /// variables of the current process
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`HandlerConfig::load`], reading environment overrides from `env`
    /// instead of the process environment when it is `Some`
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&HandlerConfig::default())?);

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading handler configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env);

        let config: HandlerConfig = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let backoff = &self.backoff;
        if backoff.initial_delay_seconds == 0 {
            return Err(HandlerCoreError::Configuration(
                "backoff.initial_delay_seconds must be greater than zero".to_string(),
            ));
        }
        if backoff.total_timeout_seconds < backoff.initial_delay_seconds {
            return Err(HandlerCoreError::Configuration(format!(
                "backoff.total_timeout_seconds ({}) is smaller than backoff.initial_delay_seconds ({})",
                backoff.total_timeout_seconds, backoff.initial_delay_seconds
            )));
        }
        if backoff.strategy == BackoffStrategy::Exponential && backoff.multiplier < 1.0 {
            return Err(HandlerCoreError::Configuration(format!(
                "backoff.multiplier must be at least 1.0, got {}",
                backoff.multiplier
            )));
        }
        if self.probing.threshold == 0 {
            return Err(HandlerCoreError::Configuration(
                "probing.threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
