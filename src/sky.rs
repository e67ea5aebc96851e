use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{Viewport, WorldConfig};
use crate::render::{Instance, Kind};
use crate::util::random::Random;

const STAR_COLOUR: u32 = 0xFFE066;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Mini-stars kept alive at all times.
    pub count: usize,
    /// Lifetime range in ticks (inclusive).
    pub lifetime: [u32; 2],
    /// Fade-in and fade-out length in ticks.
    pub fade_ticks: u32,
    /// Outer radius of the star shape (px); twice this is kept from the edges.
    pub star_outer: f64,
    /// Gap kept above the horizon (px).
    pub bottom_margin: f64,
    /// Spin magnitude range in degrees per tick.
    pub rot_speed: [f64; 2],
    /// Radians per tick.
    pub pulse_speed: f64,
    pub glow_scale_min: f64,
    pub glow_scale_range: f64,
    pub glow_alpha_min: f64,
    pub glow_alpha_range: f64,
    pub glow_draw_alpha_min: f64,
    pub glow_draw_alpha_range: f64,
    /// Master opacity applied to the whole layer.
    pub alpha: f64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            count: 10,
            lifetime: [2 * crate::config::FPS, 5 * crate::config::FPS],
            fade_ticks: 30,
            star_outer: 3.0,
            bottom_margin: 40.0,
            rot_speed: [0.25, 1.75],
            pulse_speed: std::f64::consts::TAU / 60.0,
            glow_scale_min: 0.8,
            glow_scale_range: 0.2,
            glow_alpha_min: 0.5,
            glow_alpha_range: 0.4,
            glow_draw_alpha_min: 0.35,
            glow_draw_alpha_range: 0.2,
            alpha: 0.7,
        }
    }
}

/// A small twinkling star in the sky band.
#[derive(Debug, Clone, Copy)]
pub struct MiniStar {
    pub pos: DVec2,
    pub age: u32,
    pub lifetime: u32,
    /// Signed degrees per tick.
    pub rot_speed: f64,
    /// Degrees.
    pub angle: f64,
    pub pulse_t: f64,
}

impl MiniStar {
    /// Fade-in/fade-out envelope in [0, 1].
    pub fn envelope(&self, fade_ticks: u32) -> f64 {
        if fade_ticks == 0 {
            return if self.age < self.lifetime { 1.0 } else { 0.0 };
        }
        let fade = fade_ticks as f64;
        let fade_in = (self.age as f64 / fade).min(1.0);
        let fade_out = ((self.lifetime as f64 - self.age as f64) / fade).min(1.0);
        fade_in.min(fade_out).max(0.0)
    }

    /// Pulse factor in [0, 1].
    pub fn pulse(&self) -> f64 {
        0.5 + 0.5 * self.pulse_t.sin()
    }
}

/// Self-sustaining population of twinkling sky decorations.
pub struct MiniStars {
    stars: Vec<MiniStar>,
    config: SkyConfig,
    world_config: WorldConfig,
}

impl MiniStars {
    /// Fills the whole pool right away so the sky isn't empty at start-up.
    pub fn new(
        config: SkyConfig,
        world_config: WorldConfig,
        viewport: &Viewport,
        rng: &mut impl Random,
    ) -> Self {
        let mut sky = Self {
            stars: Vec::with_capacity(config.count),
            config,
            world_config,
        };
        sky.top_up(viewport, rng);
        sky
    }

    fn spawn(&self, viewport: &Viewport, rng: &mut impl Random) -> MiniStar {
        let cfg = &self.config;
        let margin = cfg.star_outer * 2.0;
        let sky_h = viewport.grass_top(&self.world_config);
        let span_x = (viewport.width - margin * 2.0).max(0.0);
        let span_y = (sky_h - margin - cfg.bottom_margin).max(0.0);
        let pos = DVec2::new(
            margin + rng.f32() as f64 * span_x,
            margin + rng.f32() as f64 * span_y,
        );
        let [min_life, max_life] = cfg.lifetime;
        let [min_rot, max_rot] = cfg.rot_speed;
        MiniStar {
            pos,
            age: 0,
            lifetime: rng.ticks(min_life, max_life),
            rot_speed: rng.range(min_rot, max_rot) * rng.sign(),
            angle: rng.range(0.0, 360.0),
            // Stagger pulses between stars.
            pulse_t: rng.range(0.0, std::f64::consts::TAU),
        }
    }

    fn top_up(&mut self, viewport: &Viewport, rng: &mut impl Random) {
        while self.stars.len() < self.config.count {
            let star = self.spawn(viewport, rng);
            log::trace!("mini-star at ({:.0}, {:.0}) for {} ticks", star.pos.x, star.pos.y, star.lifetime);
            self.stars.push(star);
        }
    }

    /// Top up the pool, then age, spin and pulse every star. Stars whose
    /// time is up are dropped and replaced on the next tick.
    pub fn update(&mut self, viewport: &Viewport, rng: &mut impl Random) {
        self.top_up(viewport, rng);

        let pulse_speed = self.config.pulse_speed;
        self.stars.retain_mut(|s| {
            s.age += 1;
            if s.age >= s.lifetime {
                return false;
            }
            s.angle = (s.angle + s.rot_speed).rem_euclid(360.0);
            s.pulse_t += pulse_speed;
            true
        });
    }

    pub fn stars(&self) -> &[MiniStar] {
        &self.stars
    }

    pub fn count(&self) -> usize {
        self.stars.len()
    }

    pub fn build_instances(&self, buf: &mut Vec<Instance>) {
        let cfg = &self.config;
        for s in &self.stars {
            let envelope = s.envelope(cfg.fade_ticks);
            let p = s.pulse();
            let mut glow = Instance::new(Kind::MiniStarGlow, s.pos)
                .scaled(cfg.glow_scale_min + p * cfg.glow_scale_range)
                .faded((cfg.glow_alpha_min + p * cfg.glow_alpha_range) * envelope * cfg.alpha)
                .colored(STAR_COLOUR);
            // Gradient strength as a percentage, like the lure glow.
            glow.frame = ((cfg.glow_draw_alpha_min + p * cfg.glow_draw_alpha_range) * 100.0).round() as u32;
            buf.push(glow);
            buf.push(
                Instance::new(Kind::MiniStar, s.pos)
                    .rotated(s.angle)
                    .faded(envelope * cfg.alpha)
                    .colored(STAR_COLOUR),
            );
        }
    }
}
