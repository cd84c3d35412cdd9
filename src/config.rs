use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::SimTime;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("n_prio must be at least 1")]
    NoPriorityClasses,
    #[error("{name} must be positive and finite, got {value}")]
    BadTime { name: &'static str, value: f64 },
}

/// Run parameters. Times are in seconds of virtual time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Number of priority classes; the class domain is `1..=n_prio`.
    pub n_prio: usize,
    /// Whether a strictly more urgent arrival suspends the job in service.
    #[serde(default)]
    pub preemption: bool,
    /// Base service demand; class `c` jobs demand `avg_service_time * c`.
    pub avg_service_time: f64,
    /// Base inter-arrival mean; class `c` gaps have mean
    /// `avg_inter_arrival_time / c`.
    pub avg_inter_arrival_time: f64,
    /// Virtual-time horizon of the run.
    pub horizon: f64,
    #[serde(default)]
    pub seed: u64,
}

impl Config {
    pub fn from_yaml<R: io::Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_yaml(File::open(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_prio == 0 {
            return Err(ConfigError::NoPriorityClasses);
        }
        for (name, value) in [
            ("avg_service_time", self.avg_service_time),
            ("avg_inter_arrival_time", self.avg_inter_arrival_time),
            ("horizon", self.horizon),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::BadTime { name, value });
            }
        }
        Ok(())
    }

    pub fn horizon_time(&self) -> SimTime {
        SimTime::from_secs_f64(self.horizon)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_prio: 3,
            preemption: true,
            avg_service_time: 1.0,
            avg_inter_arrival_time: 10.0,
            horizon: 10_000.0,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_yaml() {
        let yaml = r#"
n_prio: 2
preemption: true
avg_service_time: 1.5
avg_inter_arrival_time: 8.0
horizon: 500.0
seed: 7"#;
        let config = Config::from_yaml(Cursor::new(yaml)).unwrap();
        assert_eq!(config.n_prio, 2);
        assert!(config.preemption);
        assert_eq!(config.seed, 7);
        assert_eq!(config.horizon_time(), SimTime::from_secs(500));
    }

    #[test]
    fn preemption_and_seed_default_off() {
        let yaml = r#"
n_prio: 1
avg_service_time: 1.0
avg_inter_arrival_time: 4.0
horizon: 10.0"#;
        let config = Config::from_yaml(Cursor::new(yaml)).unwrap();
        assert!(!config.preemption);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn rejects_zero_classes() {
        let config = Config {
            n_prio: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoPriorityClasses)
        ));
    }

    #[test]
    fn rejects_non_positive_times() {
        let config = Config {
            avg_service_time: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadTime { name: "avg_service_time", .. })
        ));
    }
}
