/*!
 * Simulation Configuration
 *
 * Pool size, tick pacing and run budget, with environment overrides
 */

use super::errors::ConfigError;
use super::limits::{
    DEFAULT_MAX_TICKS, DEFAULT_MEMORY_POOL, DEFAULT_TICK_INTERVAL, MAX_TICK_INTERVAL,
    MIN_TICK_INTERVAL,
};
use super::types::Size;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding the pool size
pub const ENV_TOTAL_MEMORY: &str = "SIM_TOTAL_MEMORY";
/// Environment variable overriding the tick interval (milliseconds)
pub const ENV_TICK_INTERVAL_MS: &str = "SIM_TICK_INTERVAL_MS";
/// Environment variable overriding the tick budget
pub const ENV_MAX_TICKS: &str = "SIM_MAX_TICKS";

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total bytes in the pool
    pub total_memory: Size,
    /// Wall-clock interval between ticks
    pub tick_interval_ms: u64,
    /// Stop driving after this many ticks
    pub max_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_MEMORY_POOL,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

impl SimulationConfig {
    /// Defaults overlaid with `SIM_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_TOTAL_MEMORY) {
            config.total_memory = parse_value(ENV_TOTAL_MEMORY, &value)?;
        }
        if let Some(value) = lookup(ENV_TICK_INTERVAL_MS) {
            config.tick_interval_ms = parse_value(ENV_TICK_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_TICKS) {
            config.max_ticks = parse_value(ENV_MAX_TICKS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_memory < 1 {
            return Err(ConfigError::EmptyPool);
        }

        let min = MIN_TICK_INTERVAL.as_millis() as u64;
        let max = MAX_TICK_INTERVAL.as_millis() as u64;
        if self.tick_interval_ms < min || self.tick_interval_ms > max {
            return Err(ConfigError::TickInterval {
                millis: self.tick_interval_ms,
                min,
                max,
            });
        }

        Ok(())
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
