//! Layout manager configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::coordinates::CoordinateConfig;
use super::force_directed::ForceLayoutConfig;

/// Errors raised while configuring the layout engine
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Failed to parse layout configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

/// Cooling curve of a running layout task.
///
/// ```text
/// cooling(k) = initial × rate^max(0, k - warmup)
/// ```
///
/// where `k` counts iterations since the task (re)started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingSchedule {
    /// Cooling parameter right after a (re)start
    pub initial: f64,
    /// Per-iteration decay factor in `(0, 1]`
    pub rate: f64,
    /// Iterations run at full temperature
    pub warmup: u64,
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        Self {
            initial: 100.0,
            rate: 0.98,
            warmup: 20,
        }
    }
}

impl CoolingSchedule {
    /// Cooling parameter after `iterations` iterations
    #[allow(clippy::cast_precision_loss)]
    pub fn at(&self, iterations: u64) -> f64 {
        let cooled = iterations.saturating_sub(self.warmup);
        self.initial * self.rate.powf(cooled as f64)
    }
}

/// Configuration for [`GraphLayoutManager`](super::GraphLayoutManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutManagerConfig {
    /// Delay between the end of one tick and the start of the next
    pub tick_interval_ms: u64,
    /// Layout iterations per tick
    pub batch_size: usize,
    /// Cooling curve, restarted with every task
    pub cooling: CoolingSchedule,
    /// Force parameters
    pub force: ForceLayoutConfig,
    /// Coordinate store settings
    pub coordinates: CoordinateConfig,
    /// Radius of the initial ring and of random placement
    pub placement_radius: f64,
    /// Random offset applied around the neighbor centroid of added nodes
    pub adding_jitter: f64,
}

impl Default for LayoutManagerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 40,
            batch_size: 5,
            cooling: CoolingSchedule::default(),
            force: ForceLayoutConfig::default(),
            coordinates: CoordinateConfig::default(),
            placement_radius: 200.0,
            adding_jitter: 50.0,
        }
    }
}

impl LayoutManagerConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        match self.first_invalid() {
            Some(problem) => Err(LayoutError::InvalidConfig(problem)),
            None => Ok(()),
        }
    }

    /// Copy with every invalid value replaced by its default.
    ///
    /// Managers built from struct literals go through this, so a zero tick
    /// interval or a negative radius never reaches the running task.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        while let Some(problem) = self.first_invalid() {
            warn!("{}, using the default", problem);
            if self.tick_interval_ms == 0 {
                self.tick_interval_ms = defaults.tick_interval_ms;
            } else if self.batch_size == 0 {
                self.batch_size = defaults.batch_size;
            } else if !valid_rate(self.cooling.rate) {
                self.cooling.rate = defaults.cooling.rate;
            } else if !non_negative(self.cooling.initial) {
                self.cooling.initial = defaults.cooling.initial;
            } else if !positive(self.force.ideal_distance) {
                self.force.ideal_distance = defaults.force.ideal_distance;
            } else if !non_negative(self.placement_radius) {
                self.placement_radius = defaults.placement_radius;
            } else {
                self.adding_jitter = defaults.adding_jitter;
            }
        }
        self
    }

    fn first_invalid(&self) -> Option<String> {
        if self.tick_interval_ms == 0 {
            return Some("tick_interval_ms must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Some("batch_size must be positive".to_string());
        }
        if !valid_rate(self.cooling.rate) {
            return Some(format!("cooling rate {} outside (0, 1]", self.cooling.rate));
        }
        if !non_negative(self.cooling.initial) {
            return Some(format!(
                "initial cooling {} must be finite and non-negative",
                self.cooling.initial
            ));
        }
        if !positive(self.force.ideal_distance) {
            return Some(format!(
                "ideal distance {} must be positive",
                self.force.ideal_distance
            ));
        }
        if !non_negative(self.placement_radius) {
            return Some(format!(
                "placement radius {} must be finite and non-negative",
                self.placement_radius
            ));
        }
        if !non_negative(self.adding_jitter) {
            return Some(format!(
                "adding jitter {} must be finite and non-negative",
                self.adding_jitter
            ));
        }
        None
    }
}

fn valid_rate(rate: f64) -> bool {
    rate > 0.0 && rate <= 1.0
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
