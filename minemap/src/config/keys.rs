//! Configuration key definitions and operations.
//!
//! This module provides type-safe configuration key handling for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::defaults::MAX_FETCH_RETRIES;
use super::parser::{expand_tilde, is_http_url};
use super::settings::ConfigFile;
use super::writer::path_to_string;
use crate::catalog::MAX_PER_PAGE;

/// Errors that can occur when working with configuration keys.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// All supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiBaseUrl,
    ApiTimeout,
    ApiPerPage,
    ReconcilerFetchTimeout,
    ReconcilerFetchRetries,
    SyncPollInterval,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "api.base_url").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ApiBaseUrl => "api.base_url",
            ConfigKey::ApiTimeout => "api.timeout",
            ConfigKey::ApiPerPage => "api.per_page",
            ConfigKey::ReconcilerFetchTimeout => "reconciler.fetch_timeout",
            ConfigKey::ReconcilerFetchRetries => "reconciler.fetch_retries",
            ConfigKey::SyncPollInterval => "sync.poll_interval",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "api").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "base_url").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ApiBaseUrl => config.api.base_url.clone(),
            ConfigKey::ApiTimeout => config.api.timeout.to_string(),
            ConfigKey::ApiPerPage => config.api.per_page.to_string(),
            ConfigKey::ReconcilerFetchTimeout => config.reconciler.fetch_timeout.to_string(),
            ConfigKey::ReconcilerFetchRetries => config.reconciler.fetch_retries.to_string(),
            ConfigKey::SyncPollInterval => config.sync.poll_interval.to_string(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value before setting; the config is untouched on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let value = value.trim();
        let failed = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };

        match self {
            ConfigKey::ApiBaseUrl => {
                config.api.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::ApiTimeout => {
                config.api.timeout = value
                    .parse()
                    .map_err(|_| failed("must be a positive integer".to_string()))?
            }
            ConfigKey::ApiPerPage => {
                config.api.per_page = value.parse().map_err(|_| {
                    failed(format!("must be an integer between 1 and {}", MAX_PER_PAGE))
                })?
            }
            ConfigKey::ReconcilerFetchTimeout => {
                config.reconciler.fetch_timeout = value
                    .parse()
                    .map_err(|_| failed("must be a positive integer".to_string()))?
            }
            ConfigKey::ReconcilerFetchRetries => {
                config.reconciler.fetch_retries = value.parse().map_err(|_| {
                    failed(format!(
                        "must be an integer between 0 and {}",
                        MAX_FETCH_RETRIES
                    ))
                })?
            }
            ConfigKey::SyncPollInterval => {
                config.sync.poll_interval = value
                    .parse()
                    .map_err(|_| failed("must be a positive integer".to_string()))?
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    /// Validate a value for this key without setting it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::ApiBaseUrl => Box::new(UrlSpec),
            ConfigKey::ApiTimeout
            | ConfigKey::ReconcilerFetchTimeout
            | ConfigKey::SyncPollInterval => Box::new(IntegerRangeSpec::at_least(1)),
            ConfigKey::ApiPerPage => Box::new(IntegerRangeSpec::between(1, MAX_PER_PAGE as u64)),
            ConfigKey::ReconcilerFetchRetries => {
                Box::new(IntegerRangeSpec::between(0, MAX_FETCH_RETRIES as u64))
            }
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// All keys, in the order `config list` prints them.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ApiBaseUrl,
            ConfigKey::ApiTimeout,
            ConfigKey::ApiPerPage,
            ConfigKey::ReconcilerFetchTimeout,
            ConfigKey::ReconcilerFetchRetries,
            ConfigKey::SyncPollInterval,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Integer within an inclusive range; no upper bound when `max` is `None`.
struct IntegerRangeSpec {
    min: u64,
    max: Option<u64>,
}

impl IntegerRangeSpec {
    fn at_least(min: u64) -> Self {
        Self { min, max: None }
    }

    fn between(min: u64, max: u64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    fn reason(&self) -> String {
        match self.max {
            Some(max) => format!("must be an integer between {} and {}", self.min, max),
            None if self.min == 1 => "must be a positive integer".to_string(),
            None => format!("must be an integer >= {}", self.min),
        }
    }
}

impl ValueSpecification for IntegerRangeSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let n = value.parse::<u64>().map_err(|_| self.reason())?;
        if n < self.min || self.max.is_some_and(|max| n > max) {
            return Err(self.reason());
        }
        Ok(())
    }
}

/// Specification for http(s) URLs.
struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if is_http_url(value) {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}
