use glam::DVec2;

use super::FlowerConfig;
use crate::util::random::Random;

/// Flower centre in screen pixels. Only moves while falling.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub DVec2);

/// Per-stage durations in ticks, rolled once at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub budding: u32,
    pub blooming: u32,
    /// Also used for wilting.
    pub falling: u32,
}

/// Fixed look of a flower, decided at spawn.
#[derive(Debug, Clone, Copy)]
pub struct Petals {
    /// Displayed width in px at scale 1.
    pub draw_size: f64,
    /// Sprite-sheet cell, row-major.
    pub cell: u32,
    pub durations: PhaseDurations,
    /// Start angle (degrees) of the budding twist, eased to 0.
    pub collapse_start_angle: f64,
    /// Start angle (degrees) of the blooming twist, eased to 0.
    pub expand_start_angle: f64,
    /// Extra twist (degrees) applied over a wilt.
    pub wilt_end_angle: f64,
    /// Degrees per tick once bloomed.
    pub rotation_speed: f64,
}

impl Petals {
    pub fn roll(cfg: &FlowerConfig, rng: &mut impl Random) -> Self {
        let cells = (cfg.sheet_cols * cfg.sheet_rows).max(1) as usize;
        let [min_size, max_size] = cfg.draw_size;
        let [min_ticks, max_ticks] = cfg.phase_ticks;
        let [min_spin, max_spin] = cfg.aged_rotation_speed;
        let mut twist = || (rng.f32() as f64 - 0.5) * 2.0 * cfg.max_rotation;
        let collapse_start_angle = twist();
        let expand_start_angle = twist();
        let wilt_end_angle = twist();
        Self {
            draw_size: rng.range(min_size, max_size),
            cell: rng.index(cells) as u32,
            durations: PhaseDurations {
                budding: rng.ticks(min_ticks, max_ticks),
                blooming: rng.ticks(min_ticks, max_ticks),
                falling: rng.ticks(min_ticks, max_ticks),
            },
            collapse_start_angle,
            expand_start_angle,
            wilt_end_angle,
            rotation_speed: rng.range(min_spin, max_spin),
        }
    }

    /// Radius within which the cat counts as touching the flower.
    pub fn reach(&self, cfg: &FlowerConfig) -> f64 {
        self.draw_size / 2.0 + cfg.overlap_radius
    }
}

/// Drop shadow cast when the lure hovers close.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shadow {
    pub alpha: f64,
}

impl Shadow {
    /// Ease toward the alpha implied by the lure's distance.
    pub fn track(&mut self, lure_dist: f64, size_factor: f64, cfg: &FlowerConfig) {
        let near = if cfg.shadow_distance > 0.0 {
            (1.0 - lure_dist / cfg.shadow_distance).max(0.0)
        } else {
            0.0
        };
        let target = near * cfg.shadow_max_alpha * size_factor;
        self.alpha += (target - self.alpha) * cfg.shadow_smoothing;
    }
}
