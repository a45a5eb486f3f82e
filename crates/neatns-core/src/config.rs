use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metric::MetricConfig;

/// Default number of neighbors averaged when novelty is used as fitness.
pub const KNN_NOVELTY_SCORE: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub novelty_threshold: f64,
    pub neighbors: usize,
    pub novelty_floor: f64,
    pub archive_seed_amount: usize,
    pub fittest_allowed_size: usize,
    pub metric: MetricConfig,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: 6.0,
            neighbors: KNN_NOVELTY_SCORE,
            novelty_floor: 0.25,
            archive_seed_amount: 1,
            fittest_allowed_size: 5,
            metric: MetricConfig::Euclidean,
        }
    }
}

impl ArchiveConfig {
    pub fn new(novelty_threshold: f64) -> Self {
        Self {
            novelty_threshold,
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `NEATNS_*` keys, keeping the default for any key
    /// that is missing or invalid. The threshold never starts below the floor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let metric = match lookup("NEATNS_METRIC") {
            Some(raw) => MetricConfig::parse(&raw).unwrap_or_else(|| {
                log::warn!("ignoring unknown NEATNS_METRIC value {raw:?}");
                defaults.metric
            }),
            None => defaults.metric,
        };

        let mut novelty_floor =
            parsed_or(&lookup, "NEATNS_NOVELTY_FLOOR", defaults.novelty_floor);
        if !novelty_floor.is_finite() || novelty_floor < 0.0 {
            log::warn!("ignoring invalid NEATNS_NOVELTY_FLOOR value {novelty_floor}");
            novelty_floor = defaults.novelty_floor;
        }

        let mut novelty_threshold = parsed_or(
            &lookup,
            "NEATNS_NOVELTY_THRESHOLD",
            defaults.novelty_threshold,
        );
        if !novelty_threshold.is_finite() || novelty_threshold < novelty_floor {
            log::warn!(
                "ignoring invalid NEATNS_NOVELTY_THRESHOLD value {novelty_threshold} (floor {novelty_floor})"
            );
            novelty_threshold = defaults.novelty_threshold.max(novelty_floor);
        }

        let mut neighbors = parsed_or(&lookup, "NEATNS_NEIGHBORS", defaults.neighbors);
        if neighbors == 0 {
            log::warn!("ignoring invalid NEATNS_NEIGHBORS value 0");
            neighbors = defaults.neighbors;
        }

        Self {
            novelty_threshold,
            neighbors,
            novelty_floor,
            archive_seed_amount: parsed_or(
                &lookup,
                "NEATNS_ARCHIVE_SEED_AMOUNT",
                defaults.archive_seed_amount,
            ),
            fittest_allowed_size: parsed_or(
                &lookup,
                "NEATNS_FITTEST_ALLOWED_SIZE",
                defaults.fittest_allowed_size,
            ),
            metric,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.novelty_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "novelty_threshold",
                reason: format!("must be finite, got {}", self.novelty_threshold),
            });
        }
        if !self.novelty_floor.is_finite() || self.novelty_floor < 0.0 {
            return Err(ConfigError::Invalid {
                field: "novelty_floor",
                reason: format!("must be finite and >= 0, got {}", self.novelty_floor),
            });
        }
        if self.novelty_threshold < self.novelty_floor {
            return Err(ConfigError::Invalid {
                field: "novelty_threshold",
                reason: format!(
                    "must be >= novelty_floor {}, got {}",
                    self.novelty_floor, self.novelty_threshold
                ),
            });
        }
        if self.neighbors == 0 {
            return Err(ConfigError::Invalid {
                field: "neighbors",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parsed_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable {key} value {raw:?}");
            default
        }),
        None => default,
    }
}
