/// Configuration for authoring runs against an NLU service
use crate::error::{NluServiceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on how long a single training run may be awaited
const MAX_TRAINING_TIMEOUT_SECS: u64 = 3600;

/// Environment variable prefix read by [`AuthoringConfig::from_env`]
pub const ENV_PREFIX: &str = "NLUFORGE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoringConfig {
    /// Culture for new applications when the manifest does not set one
    pub culture: String,

    /// Slot the trained version is published to and queried from
    pub slot_name: String,

    /// Allow child labels below the first level in labeled examples
    pub enable_nested_children: bool,

    /// Give up waiting for training after this many seconds
    pub training_timeout_secs: u64,

    /// First delay between training status checks
    pub poll_initial_interval_ms: u64,

    /// Delays double after each check up to this ceiling
    pub poll_max_interval_ms: u64,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            culture: "en-us".to_string(),
            slot_name: "Production".to_string(),
            enable_nested_children: true,
            training_timeout_secs: 120,
            poll_initial_interval_ms: 250,
            poll_max_interval_ms: 5000,
        }
    }
}

impl AuthoringConfig {
    /// Defaults overlaid with `NLUFORGE_*` environment variables
    ///
    /// - `NLUFORGE_CULTURE`
    /// - `NLUFORGE_SLOT_NAME`
    /// - `NLUFORGE_ENABLE_NESTED_CHILDREN`
    /// - `NLUFORGE_TRAINING_TIMEOUT_SECS`
    /// - `NLUFORGE_POLL_INITIAL_INTERVAL_MS`
    /// - `NLUFORGE_POLL_MAX_INTERVAL_MS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Defaults overlaid with values from `lookup` (keys without prefix)
    ///
    /// Unparseable values are reported rather than silently ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(culture) = lookup("CULTURE") {
            config.culture = culture;
        }
        if let Some(slot) = lookup("SLOT_NAME") {
            config.slot_name = slot;
        }
        if let Some(v) = lookup("ENABLE_NESTED_CHILDREN") {
            config.enable_nested_children = parse_value("ENABLE_NESTED_CHILDREN", &v)?;
        }
        if let Some(v) = lookup("TRAINING_TIMEOUT_SECS") {
            config.training_timeout_secs = parse_value("TRAINING_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("POLL_INITIAL_INTERVAL_MS") {
            config.poll_initial_interval_ms = parse_value("POLL_INITIAL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("POLL_MAX_INTERVAL_MS") {
            config.poll_max_interval_ms = parse_value("POLL_MAX_INTERVAL_MS", &v)?;
        }

        config.validate().map_err(NluServiceError::ConfigError)?;
        Ok(config)
    }

    pub fn training_timeout(&self) -> Duration {
        Duration::from_secs(self.training_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.culture.trim().is_empty() {
            return Err("culture cannot be empty".to_string());
        }

        if self.slot_name.trim().is_empty() {
            return Err("slot_name cannot be empty".to_string());
        }

        if self.training_timeout_secs == 0 {
            return Err("training_timeout_secs must be greater than 0".to_string());
        }

        if self.training_timeout_secs > MAX_TRAINING_TIMEOUT_SECS {
            return Err(format!(
                "training_timeout_secs cannot exceed {}",
                MAX_TRAINING_TIMEOUT_SECS
            ));
        }

        if self.poll_initial_interval_ms == 0 {
            return Err("poll_initial_interval_ms must be greater than 0".to_string());
        }

        if self.poll_max_interval_ms < self.poll_initial_interval_ms {
            return Err(
                "poll_max_interval_ms cannot be smaller than poll_initial_interval_ms".to_string(),
            );
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        NluServiceError::ConfigError(format!(
            "{}{} has invalid value '{}'",
            ENV_PREFIX, key, value
        ))
    })
}
