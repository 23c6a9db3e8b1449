//! Engine tuning configuration
//!
//! Two process-wide tuning values drive the analog classifiers: the stick
//! dead-zone radius and the trigger press threshold. Both live in [0, 1];
//! out-of-range values are clamped, never rejected, and may be changed at
//! any time through the dispatcher. Values can also be loaded from a YAML
//! file for the diagnostic binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Analog tuning for the whole engine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Radius around stick center treated as neutral.
    #[serde(default = "default_dead_zone_radius")]
    pub dead_zone_radius: f32,

    /// Trigger travel at or above which a trigger counts as pressed.
    #[serde(default = "default_trigger_press_threshold")]
    pub trigger_press_threshold: f32,
}

fn default_dead_zone_radius() -> f32 {
    0.25
}

fn default_trigger_press_threshold() -> f32 {
    0.95
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dead_zone_radius: default_dead_zone_radius(),
            trigger_press_threshold: default_trigger_press_threshold(),
        }
    }
}

impl EngineConfig {
    /// Set the dead-zone radius, clamping to [0, 1].
    ///
    /// A radius of exactly 0 is accepted but leaves every stick permanently
    /// outside its dead zone, so dead-zone transitions (and with them stick
    /// direction-change detection) no longer occur. That degraded mode is
    /// reported with a warning rather than treated as an error.
    pub fn set_dead_zone_radius(&mut self, radius: f32) {
        let clamped = radius.clamp(0.0, 1.0);
        if clamped != radius {
            debug!("Dead-zone radius {} clamped to {}", radius, clamped);
        }
        if clamped == 0.0 {
            warn!(
                "Dead-zone radius set to 0: stick direction changes can no longer be detected"
            );
        }
        self.dead_zone_radius = clamped;
    }

    /// Set the trigger press threshold, clamping to [0, 1].
    pub fn set_trigger_press_threshold(&mut self, threshold: f32) {
        let clamped = threshold.clamp(0.0, 1.0);
        if clamped != threshold {
            debug!(
                "Trigger press threshold {} clamped to {}",
                threshold, clamped
            );
        }
        self.trigger_press_threshold = clamped;
    }

    /// Return a copy with both values pushed through the clamping setters.
    pub fn clamped(mut self) -> Self {
        self.set_dead_zone_radius(self.dead_zone_radius);
        self.set_trigger_press_threshold(self.trigger_press_threshold);
        self
    }

    /// Load configuration from a YAML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.dead_zone_radius, 0.25);
        assert_eq!(config.trigger_press_threshold, 0.95);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut config = EngineConfig::default();
        config.set_dead_zone_radius(1.7);
        assert_eq!(config.dead_zone_radius, 1.0);
        config.set_dead_zone_radius(-0.5);
        assert_eq!(config.dead_zone_radius, 0.0);

        config.set_trigger_press_threshold(2.0);
        assert_eq!(config.trigger_press_threshold, 1.0);
        config.set_trigger_press_threshold(-1.0);
        assert_eq!(config.trigger_press_threshold, 0.0);
    }

    #[test]
    fn test_yaml_with_missing_fields_uses_defaults() {
        let config: EngineConfig = serde_yaml::from_str("dead_zone_radius: 0.3\n").unwrap();
        assert_eq!(config.dead_zone_radius, 0.3);
        assert_eq!(config.trigger_press_threshold, 0.95);
    }
}
