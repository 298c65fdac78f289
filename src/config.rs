use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::EnrichError;
use crate::registry::{RetryPolicy, DEFAULT_BASE_URL};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub registry: RegistrySettings,
    pub enrich: EnrichSettings,
    pub retry: RetrySettings,
    pub dataset: DatasetSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RegistrySettings {
    pub base_url: String,
    /// Falls back to the `API_KEY` environment variable when unset
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            page_size: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnrichSettings {
    /// Multiplier for the sample-point offsets
    pub radius: f64,
    /// Stop after this many stations
    pub limit: Option<usize>,
    pub cache_queries: bool,
    pub on_station_error: FailurePolicy,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            limit: None,
            cache_queries: false,
            on_station_error: FailurePolicy::SkipStation,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            multiplier: policy.multiplier,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            multiplier: self.multiplier,
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Stations need strictly more available feed-in capacity than this (MVA)
    pub min_feed_in: f64,
    /// Stations need strictly more available offtake capacity than this (MVA)
    pub min_offtake: f64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("output/beschikbare_capaciteit_elektriciteitsnet.csv"),
            output: PathBuf::from("output/station_data.csv"),
            min_feed_in: 0.0,
            min_offtake: 0.0,
        }
    }
}

/// What the aggregator does when a station cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log, drop that station's rows and continue with the next one
    #[default]
    SkipStation,
    /// Stop the run with the first station error
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "skip" | "skip_station" | "skip-station" => Ok(FailurePolicy::SkipStation),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!(
                "unknown failure policy {:?} (expected skip_station or abort)",
                other
            )),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), EnrichError> {
        let fail = |msg: String| Err(EnrichError::Config(msg));

        if !self.enrich.radius.is_finite() || self.enrich.radius <= 0.0 {
            return fail(format!("radius must be positive, got {}", self.enrich.radius));
        }
        if self.registry.page_size == 0 {
            return fail("page_size must be at least 1".to_string());
        }
        if self.registry.timeout_secs == 0 {
            return fail("timeout_secs must be at least 1".to_string());
        }
        if self.retry.max_attempts == 0 {
            return fail("max_attempts must be at least 1".to_string());
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return fail(format!(
                "retry multiplier must be >= 1, got {}",
                self.retry.multiplier
            ));
        }
        Ok(())
    }
}
