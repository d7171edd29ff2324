use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::engine::cluster::metadata::{LifecycleDefaults, MergeSettings, RolloverConditions};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub lifecycle: LifecycleSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct LifecycleSettings {
    /// Seconds between reconciliation passes.
    pub poll_interval: u64,
    /// Default rollover thresholds, used by streams without an explicit
    /// rollover policy. At least one of the max_* fields must be set.
    pub rollover_max_age_secs: Option<u64>,
    pub rollover_max_docs: Option<u64>,
    pub rollover_max_primary_size_bytes: Option<u64>,
    /// Floor below which a write target is never rolled, so idle streams
    /// do not accumulate empty generations.
    pub rollover_min_docs: Option<u64>,
    /// Merge-policy targets every backing segment converges toward.
    pub merge_factor: u32,
    pub merge_floor_segment_bytes: u64,
}

impl LifecycleSettings {
    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn defaults(&self) -> LifecycleDefaults {
        LifecycleDefaults {
            rollover: RolloverConditions {
                max_age_millis: self.rollover_max_age_secs.map(|s| s * 1_000),
                max_docs: self.rollover_max_docs,
                max_primary_size_bytes: self.rollover_max_primary_size_bytes,
                min_docs: self.rollover_min_docs.unwrap_or(1),
            },
            merge: MergeSettings {
                factor: self.merge_factor,
                floor_segment_bytes: self.merge_floor_segment_bytes,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("TIDEMARK_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
