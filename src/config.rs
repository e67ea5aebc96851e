use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cat::CatConfig;
use crate::flowers::FlowerConfig;
use crate::lure::LureConfig;
use crate::particles::ParticleConfig;
use crate::sky::SkyConfig;

/// Nominal simulation rate. All durations in the engine are tick counts.
pub const FPS: u32 = 60;

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Every tunable in the simulation, grouped per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub lure: LureConfig,
    pub cat: CatConfig,
    pub flowers: FlowerConfig,
    pub particles: ParticleConfig,
    pub sky: SkyConfig,
}

impl SimConfig {
    /// Load a JSON config. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine can't clamp into something meaningful.
    ///
    /// Zero durations are fine (a zero-length phase completes immediately).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.world.sky_fraction;
        if !(0.0..1.0).contains(&fraction) {
            return Err(ConfigError::Invalid {
                field: "world.sky_fraction",
                reason: "must be in [0, 1)",
            });
        }
        if !(self.lure.lerp > 0.0 && self.lure.lerp <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "lure.lerp",
                reason: "must be in (0, 1]",
            });
        }
        if self.cat.stop_distance >= self.cat.start_distance {
            return Err(ConfigError::Invalid {
                field: "cat.stop_distance",
                reason: "must be smaller than cat.start_distance",
            });
        }
        if !(self.particles.drag > 0.0 && self.particles.drag < 1.0) {
            return Err(ConfigError::Invalid {
                field: "particles.drag",
                reason: "must be in (0, 1)",
            });
        }
        Ok(())
    }
}

/// Sky/grass split and perspective scaling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Top fraction of the screen that is sky; the rest is grass.
    pub sky_fraction: f64,
    /// Scale multiplier at the horizon (far away).
    pub depth_scale_top: f64,
    /// Scale multiplier at the bottom edge (close).
    pub depth_scale_bottom: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            sky_fraction: 1.0 / 5.0,
            depth_scale_top: 0.5,
            depth_scale_bottom: 2.25,
        }
    }
}

/// Current viewport geometry in pixels. Queried at spawn time, never cached
/// by entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Non-finite or negative sizes collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// y pixel where the grass begins (sky/grass horizon).
    pub fn grass_top(&self, world: &WorldConfig) -> f64 {
        self.height * world.sky_fraction
    }

    /// Depth ratio in [0, 1]: 0 at the horizon, 1 at the bottom edge.
    pub fn depth_t(&self, world: &WorldConfig, y: f64) -> f64 {
        let top = self.grass_top(world);
        let grass_h = self.height - top;
        if grass_h <= 0.0 {
            return 0.0;
        }
        ((y - top) / grass_h).clamp(0.0, 1.0)
    }

    /// Perspective scale at `y`. Clamped to the horizon value in the sky.
    pub fn depth_scale(&self, world: &WorldConfig, y: f64) -> f64 {
        let t = self.depth_t(world, y);
        world.depth_scale_top + t * (world.depth_scale_bottom - world.depth_scale_top)
    }
}
