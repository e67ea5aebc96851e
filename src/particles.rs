use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::render::{Instance, Kind};
use crate::util::random::Random;

/// Maximum concurrent particles.
const MAX_PARTICLES: usize = 2048;

/// Which event a burst celebrates. Selects count, speed, size and palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    /// Lure switched to active.
    Activate,
    /// Lure switched to passive.
    Deactivate,
    /// A flower was knocked off its stem.
    Ring,
}

impl BurstKind {
    /// Burst for a lure that just switched into `active`.
    pub fn for_lure(active: bool) -> Self {
        if active {
            BurstKind::Activate
        } else {
            BurstKind::Deactivate
        }
    }
}

/// Shape of one burst flavour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub count: u32,
    /// Base speed in px/tick, scaled by a random 0.6..1.4 per particle.
    pub speed: f64,
    /// Diameter in px at full life.
    pub size: f64,
    pub palette: Vec<u32>,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 18,
            speed: 8.0,
            size: 12.0,
            palette: vec![0xFFE066, 0xF0A500, 0xFFF4A0, 0xFFCC00],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Velocity multiplier applied every tick.
    pub drag: f64,
    /// Lifetime of every particle, in ticks.
    pub life: u32,
    pub active: BurstConfig,
    pub passive: BurstConfig,
    pub ring: BurstConfig,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            drag: 0.92,
            life: 25,
            active: BurstConfig::default(),
            passive: BurstConfig {
                count: 10,
                speed: 5.0,
                size: 8.0,
                palette: vec![0xAAD4FF, 0x6699CC, 0xCCEEFF, 0xFFFFFF],
            },
            ring: BurstConfig {
                count: 12,
                speed: 4.0,
                size: 6.0,
                palette: vec![0xFFB7D5, 0xFFFFFF, 0xF6E27A, 0xE8A0C8],
            },
        }
    }
}

impl ParticleConfig {
    fn burst(&self, kind: BurstKind) -> &BurstConfig {
        match kind {
            BurstKind::Activate => &self.active,
            BurstKind::Deactivate => &self.passive,
            BurstKind::Ring => &self.ring,
        }
    }
}

/// A single burst particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Ticks left; the particle dies when this reaches 0.
    pub life: u32,
    pub total_life: u32,
    pub color: u32,
    pub size: f64,
}

impl Particle {
    /// Remaining life as a fraction; drives both opacity and scale.
    pub fn progress(&self) -> f64 {
        if self.total_life == 0 {
            return 0.0;
        }
        self.life as f64 / self.total_life as f64
    }
}

/// Short-lived decorative burst particles.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    config: ParticleConfig,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            config,
        }
    }

    /// Spawn a ring of particles evenly spaced around `origin`.
    pub fn burst(&mut self, origin: DVec2, kind: BurstKind, rng: &mut impl Random) {
        let life = self.config.life;
        if life == 0 {
            return;
        }
        let shape = self.config.burst(kind);
        let count = shape.count;
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                log::warn!("particle cap reached, dropping rest of {kind:?} burst");
                break;
            }
            let angle = i as f64 / count as f64 * std::f64::consts::TAU;
            let speed = shape.speed * (0.6 + rng.f32() as f64 * 0.8);
            let color = if shape.palette.is_empty() {
                0xFFFFFF
            } else {
                shape.palette[rng.index(shape.palette.len())]
            };
            self.particles.push(Particle {
                pos: origin,
                vel: DVec2::from_angle(angle) * speed,
                life,
                total_life: life,
                color,
                size: shape.size,
            });
        }
        log::trace!("{kind:?} burst of {count} at ({:.0}, {:.0})", origin.x, origin.y);
    }

    /// Move, drag and age every particle; drop the dead ones.
    pub fn update(&mut self) {
        let drag = self.config.drag;
        // Update in-place, swap-remove dead ones
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel;
            p.vel *= drag;
            p.life = p.life.saturating_sub(1);

            if p.life == 0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append particle instances to the render buffer.
    pub fn build_instances(&self, buf: &mut Vec<Instance>) {
        for p in &self.particles {
            let t = p.progress();
            let mut inst = Instance::new(Kind::Particle, p.pos)
                .scaled(t)
                .faded(t)
                .colored(p.color);
            inst.variant = p.size.round() as u32;
            buf.push(inst);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of active particles.
    pub fn count(&self) -> usize {
        self.particles.len()
    }
}
