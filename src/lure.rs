use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::particles::{BurstKind, ParticleSystem};
use crate::render::{Instance, Kind};
use crate::util::random::Random;

/// Star body colour.
const COLOUR: u32 = 0xFFE066;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LureConfig {
    /// Fraction of the remaining distance covered each tick.
    pub lerp: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Exponential smoothing factor for the visual scale.
    pub scale_smoothing: f64,
    /// Degrees per tick while the pointer is still.
    pub rot_min_speed: f64,
    /// Degrees per tick while the pointer moves fast.
    pub rot_max_speed: f64,
    /// Pointer speed (px/tick) at which size and spin saturate.
    pub speed_norm: f64,
    /// Radians per tick of the glow pulse.
    pub pulse_speed: f64,
    /// Star alpha while passive.
    pub passive_alpha: f64,
}

impl Default for LureConfig {
    fn default() -> Self {
        Self {
            lerp: 0.1,
            min_size: 1.0,
            max_size: 2.0,
            scale_smoothing: 0.15,
            rot_min_speed: 0.75,
            rot_max_speed: 7.5,
            speed_norm: 20.0,
            pulse_speed: std::f64::consts::TAU / 60.0,
            passive_alpha: 0.4,
        }
    }
}

/// Glow drawn around the star while it is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Alpha baked into the drawn gradient.
    pub draw_alpha: f64,
    pub scale: f64,
    pub alpha: f64,
}

/// The pointer-following star the cat chases.
#[derive(Debug, Clone)]
pub struct Lure {
    pos: DVec2,
    target: DVec2,
    prev_target: DVec2,
    active: bool,
    scale: f64,
    /// Degrees, wrapped to [0, 360).
    angle: f64,
    pulse_t: f64,
    config: LureConfig,
}

impl Lure {
    /// A lure resting at `pos`, active, with the pointer assumed to be there.
    pub fn new(config: LureConfig, pos: DVec2) -> Self {
        Self {
            pos,
            target: pos,
            prev_target: pos,
            active: true,
            scale: config.min_size,
            angle: 0.0,
            pulse_t: 0.0,
            config,
        }
    }

    /// Advance one tick toward `target`. Non-finite samples are ignored and
    /// the previous target is kept.
    pub fn update(&mut self, target: DVec2) {
        if target.is_finite() {
            self.target = target;
        }
        let target = self.target;
        let cfg = &self.config;

        self.pos += (target - self.pos) * cfg.lerp;

        let pointer_speed = target.distance(self.prev_target);
        self.prev_target = target;
        let speed_t = if cfg.speed_norm > 0.0 {
            (pointer_speed / cfg.speed_norm).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let target_scale = if self.active {
            cfg.min_size + speed_t * (cfg.max_size - cfg.min_size)
        } else {
            cfg.min_size
        };
        self.scale += (target_scale - self.scale) * cfg.scale_smoothing;

        let rot_speed = cfg.rot_min_speed + speed_t * (cfg.rot_max_speed - cfg.rot_min_speed);
        self.angle = (self.angle + rot_speed).rem_euclid(360.0);

        self.pulse_t += cfg.pulse_speed;
    }

    /// Flip between active and passive, announcing it with a burst at the
    /// star's current position.
    pub fn toggle(&mut self, particles: &mut ParticleSystem, rng: &mut impl Random) {
        self.active = !self.active;
        log::debug!("lure toggled, active = {}", self.active);
        particles.burst(self.pos, BurstKind::for_lure(self.active), rng);
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Smoothed visual scale. Only applied to the star while active.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> f64 {
        self.angle
    }

    /// Pulse factor in [0, 1].
    pub fn pulse(&self) -> f64 {
        0.5 + 0.5 * self.pulse_t.sin()
    }

    /// Glow parameters, or `None` while passive.
    pub fn glow(&self) -> Option<Glow> {
        if !self.active {
            return None;
        }
        let p = self.pulse();
        Some(Glow {
            draw_alpha: 0.4 + p * 0.2,
            scale: 0.8 + p * 0.2,
            alpha: (0.6 + p * 0.5).min(1.0),
        })
    }

    pub fn build_instances(&self, buf: &mut Vec<Instance>) {
        if let Some(glow) = self.glow() {
            let mut inst = Instance::new(Kind::LureGlow, self.pos)
                .scaled(glow.scale)
                .faded(glow.alpha)
                .colored(COLOUR);
            // Gradient strength rides along in `frame` as a percentage.
            inst.frame = (glow.draw_alpha * 100.0).round() as u32;
            buf.push(inst);
        }

        let (scale, alpha) = if self.active {
            (self.scale, 1.0)
        } else {
            (self.config.min_size, self.config.passive_alpha)
        };
        buf.push(
            Instance::new(Kind::Lure, self.pos)
                .scaled(scale)
                .rotated(self.angle)
                .faded(alpha)
                .colored(COLOUR),
        );
    }
}
