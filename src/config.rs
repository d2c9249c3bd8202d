//! Session configuration
//!
//! Supplied once when a session is built. Dynamic resizing is not supported:
//! the viewport captured here is used for the whole session.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Easing;

/// Configuration problems detected before any simulation state exists
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewport dimensions must be positive (got {width}x{height})")]
    Viewport { width: f32, height: f32 },
    #[error("spawn radius bounds must satisfy 0 < min <= max (got {min}..{max})")]
    SpawnRadius { min: f32, max: f32 },
    #[error("spawn interval must be positive (got {0} ms)")]
    SpawnInterval(f64),
    #[error("shrink duration must be positive (got {0} ms)")]
    ShrinkDuration(f64),
    #[error("parse error")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Visible play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Player position and projectile origin
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when a circle lies entirely past any edge
    pub fn circle_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius < 0.0
            || pos.x - radius > self.width
            || pos.y + radius < 0.0
            || pos.y - radius > self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Enemy spawner settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Milliseconds between spawns
    pub interval_ms: f64,
    /// Smallest spawned enemy radius
    pub min_radius: f32,
    /// Largest spawned enemy radius
    pub max_radius: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0,
            min_radius: 5.0,
            max_radius: 50.0,
        }
    }
}

/// Everything a session needs to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    pub spawn: SpawnConfig,
    /// Duration of the radius shrink after a non-lethal hit
    pub shrink_duration_ms: f64,
    /// Curve the shrink follows
    pub easing: Easing,
    /// Fixed RNG seed; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            spawn: SpawnConfig::default(),
            shrink_duration_ms: 500.0,
            easing: Easing::QuadOut,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration for the given viewport
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values that would corrupt simulation state
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        // Written as negations so NaN fails too
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Viewport { width, height });
        }
        let SpawnConfig {
            interval_ms,
            min_radius,
            max_radius,
        } = self.spawn;
        if !(min_radius > 0.0 && max_radius >= min_radius) {
            return Err(ConfigError::SpawnRadius {
                min: min_radius,
                max: max_radius,
            });
        }
        if !(interval_ms > 0.0) {
            return Err(ConfigError::SpawnInterval(interval_ms));
        }
        if !(self.shrink_duration_ms > 0.0) {
            return Err(ConfigError::ShrinkDuration(self.shrink_duration_ms));
        }
        Ok(())
    }
}
