//! Plain configuration value types. This crate does no file I/O — a caller
//! embedding it can populate `SchedulerConfig` however it likes (parsed
//! from its own config format, built in code, etc).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dags::{DEFAULT_ALPHA, DEFAULT_BETA};

/// Tunables for a scheduling run, the synchronous-simulator equivalent of
/// a `Config`/`ExecutorOptions` pair (minus anything backend/processor
/// specific).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default)]
    pub enable_hint_passthrough: bool,
    #[serde(default)]
    pub enable_edge_augmentation: bool,
    #[serde(default)]
    pub enable_memory_bandwidth_floor: bool,
    #[serde(default)]
    pub bandwidth_floors: HashMap<String, f64>,
    #[serde(default)]
    pub enable_timing: bool,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            enable_hint_passthrough: false,
            enable_edge_augmentation: false,
            enable_memory_bandwidth_floor: false,
            bandwidth_floors: HashMap::new(),
            enable_timing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_dags_default_weights() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.alpha, DEFAULT_ALPHA);
        assert_eq!(cfg.beta, DEFAULT_BETA);
    }

    #[test]
    fn deserializes_from_partial_json_with_defaults() {
        let cfg: SchedulerConfig = serde_json::from_str(r#"{"alpha": 0.7}"#).unwrap();
        assert_eq!(cfg.alpha, 0.7);
        assert_eq!(cfg.beta, DEFAULT_BETA);
        assert!(!cfg.enable_edge_augmentation);
    }
}
