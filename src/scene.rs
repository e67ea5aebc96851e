use glam::DVec2;

use crate::cat::Cat;
use crate::config::{SimConfig, Viewport};
use crate::flowers::FlowerField;
use crate::lure::Lure;
use crate::particles::ParticleSystem;
use crate::render::Instance;
use crate::sky::MiniStars;
use crate::util::random::Random;

/// One independent simulation: every component plus the inputs they share.
///
/// Pointer samples and clicks may arrive any time between ticks; only the
/// latest pointer sample matters when `tick` runs.
pub struct Scene<R: Random = fastrand::Rng> {
    viewport: Viewport,
    pointer: DVec2,
    flowers: FlowerField,
    sky: MiniStars,
    particles: ParticleSystem,
    lure: Lure,
    cat: Cat,
    rng: R,
    tick_count: u64,
}

impl Scene<fastrand::Rng> {
    /// Scene driven by a seeded `fastrand` generator.
    pub fn new(config: SimConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, fastrand::Rng::with_seed(seed))
    }
}

impl<R: Random> Scene<R> {
    /// Lure, cat and pointer all start at the centre of the viewport.
    pub fn with_rng(config: SimConfig, viewport: Viewport, mut rng: R) -> Self {
        let center = DVec2::new(viewport.width / 2.0, viewport.height / 2.0);
        let sky = MiniStars::new(config.sky, config.world, &viewport, &mut rng);
        let cat = Cat::new(config.cat, center, &mut rng);
        Self {
            viewport,
            pointer: center,
            flowers: FlowerField::new(config.flowers, config.world),
            sky,
            particles: ParticleSystem::new(config.particles),
            lure: Lure::new(config.lure, center),
            cat,
            rng,
            tick_count: 0,
        }
    }

    /// Latest pointer sample in viewport pixels. Non-finite samples are
    /// dropped.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        let sample = DVec2::new(x, y);
        if sample.is_finite() {
            self.pointer = sample;
        }
    }

    /// Click/tap: flip the lure's mode right away.
    pub fn toggle_lure(&mut self) {
        self.lure.toggle(&mut self.particles, &mut self.rng);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        log::debug!("viewport resized to {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Run one simulation tick.
    ///
    /// Flowers see the cat and lure where they stood at the end of the
    /// previous tick.
    pub fn tick(&mut self) {
        let cat_pos = self.cat.position();
        let lure_pos = self.lure.position();

        // 1. Flowers react to last tick's cat and lure
        self.flowers.update(
            cat_pos,
            lure_pos,
            &self.viewport,
            &mut self.particles,
            &mut self.rng,
        );

        // 2. Sky keeps itself topped up
        self.sky.update(&self.viewport, &mut self.rng);

        // 3. Burst particles
        self.particles.update();

        // 4. Lure follows the pointer
        self.lure.update(self.pointer);

        // 5. Cat chases the lure
        self.cat
            .update(self.lure.position(), self.lure.is_active(), &mut self.rng);

        self.tick_count += 1;
    }

    /// Append every visual, back to front.
    pub fn build_instances(&self, buf: &mut Vec<Instance>) {
        self.sky.build_instances(buf);
        self.flowers.build_instances(&self.viewport, buf);
        self.cat.build_instances(buf);
        self.lure.build_instances(buf);
        self.particles.build_instances(buf);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    pub fn lure(&self) -> &Lure {
        &self.lure
    }

    pub fn cat(&self) -> &Cat {
        &self.cat
    }

    pub fn flowers(&self) -> &FlowerField {
        &self.flowers
    }

    pub fn sky(&self) -> &MiniStars {
        &self.sky
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat::Motion;
    use crate::flowers::components::{Petals, PhaseDurations};
    use crate::flowers::lifecycle::Stage;
    use crate::flowers::FlowerConfig;
    use crate::render::Kind;

    fn scene(seed: u64) -> Scene {
        Scene::new(SimConfig::default(), Viewport::new(1280.0, 720.0), seed)
    }

    #[test]
    fn same_seed_same_world() {
        let mut a = scene(42);
        let mut b = scene(42);
        for i in 0..600 {
            let t = i as f64 * 0.05;
            a.set_pointer(640.0 + 500.0 * t.cos(), 400.0 + 250.0 * (2.0 * t).sin());
            b.set_pointer(640.0 + 500.0 * t.cos(), 400.0 + 250.0 * (2.0 * t).sin());
            if i % 150 == 0 {
                a.toggle_lure();
                b.toggle_lure();
            }
            a.tick();
            b.tick();
        }
        let (mut ia, mut ib) = (Vec::new(), Vec::new());
        a.build_instances(&mut ia);
        b.build_instances(&mut ib);
        assert_eq!(ia, ib);
        assert_eq!(a.tick_count(), 600);
    }

    #[test]
    fn click_bursts_at_lure_immediately() {
        let mut s = scene(1);
        s.toggle_lure();
        assert!(!s.lure().is_active());
        assert_eq!(s.particles().count(), 10);
        assert!(s
            .particles()
            .particles()
            .iter()
            .all(|p| p.pos == s.lure().position()));
    }

    #[test]
    fn cat_chases_distant_pointer_and_settles() {
        let mut s = scene(2);
        s.set_pointer(1200.0, 650.0);
        let mut chased = false;
        for _ in 0..1500 {
            s.tick();
            chased |= s.cat().is_moving();
        }
        assert!(chased);
        assert!(matches!(s.cat().motion(), Motion::Idle(_)));
        assert!(s.cat().position().distance(s.lure().position()) < 100.0);
    }

    #[test]
    fn passive_lure_keeps_cat_home() {
        let mut s = scene(3);
        s.toggle_lure();
        s.set_pointer(0.0, 0.0);
        let start = s.cat().position();
        for _ in 0..300 {
            s.tick();
        }
        assert_eq!(s.cat().position(), start);
    }

    #[test]
    fn nan_pointer_is_ignored() {
        let mut s = scene(4);
        s.set_pointer(100.0, 100.0);
        s.set_pointer(f64::NAN, f64::INFINITY);
        assert_eq!(s.pointer(), DVec2::new(100.0, 100.0));
        s.tick();
        assert!(s.lure().position().is_finite());
    }

    #[test]
    fn flowers_spawn_into_resized_viewport() {
        let config = SimConfig {
            flowers: FlowerConfig {
                spawn_interval: 1,
                max_count: 20,
                ..FlowerConfig::default()
            },
            ..SimConfig::default()
        };
        let mut s = Scene::new(config, Viewport::new(1280.0, 720.0), 9);
        s.resize(320.0, 240.0);
        for _ in 0..20 {
            s.tick();
        }
        assert_eq!(s.flowers().count(), 20);
        for v in s.flowers().views(s.viewport()) {
            assert!(v.center.x <= 320.0 && v.center.y <= 240.0);
        }
    }

    #[test]
    fn instances_are_layered_back_to_front() {
        let mut s = scene(5);
        for _ in 0..200 {
            s.tick();
        }
        s.toggle_lure();
        s.toggle_lure();
        let mut buf = Vec::new();
        s.build_instances(&mut buf);

        let layer = |inst: &Instance| match inst.kind {
            k if k == Kind::MiniStarGlow as u32 || k == Kind::MiniStar as u32 => 0,
            k if k == Kind::FlowerShadow as u32 || k == Kind::Flower as u32 => 1,
            k if k == Kind::Cat as u32 => 2,
            k if k == Kind::LureGlow as u32 || k == Kind::Lure as u32 => 3,
            _ => 4,
        };
        let layers: Vec<u8> = buf.iter().map(layer).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(buf.iter().filter(|i| i.is(Kind::Cat)).count(), 1);
        assert!(buf.iter().filter(|i| i.is(Kind::Particle)).count() >= 28);
        assert!(s.flowers().count() >= 1);
    }

    #[test]
    fn bud_blooms_the_tick_after_the_cat_arrives() {
        let flowers = FlowerConfig {
            max_count: 1,
            overlap_radius: 150.0,
            ..FlowerConfig::default()
        };
        let config = SimConfig {
            flowers,
            ..SimConfig::default()
        };
        let mut s = Scene::new(config, Viewport::new(1280.0, 720.0), 6);
        let bud_at = DVec2::new(1040.0, 360.0);
        let petals = Petals {
            draw_size: 30.0,
            cell: 0,
            durations: PhaseDurations {
                budding: 1,
                blooming: 30,
                falling: 30,
            },
            collapse_start_angle: 0.0,
            expand_start_angle: 0.0,
            wilt_end_angle: 0.0,
            rotation_speed: 0.0,
        };
        let reach = petals.reach(&flowers);
        let id = s.flowers.spawn(bud_at, petals);
        s.set_pointer(bud_at.x, bud_at.y);

        let mut prev_cat = s.cat().position();
        let mut arrived = None;
        for tick in 0..2000 {
            let was_close = prev_cat.distance(bud_at) < reach;
            s.tick();
            let stage = s.flowers().get(s.viewport(), id).map(|v| v.stage);
            let close = s.cat().position().distance(bud_at) < reach;
            if was_close {
                assert!(matches!(stage, Some(Stage::Blooming(_))));
                break;
            }
            if tick > 0 {
                // The cat may already be on the bud; it only counts next tick.
                assert_eq!(stage, Some(Stage::Bud));
            }
            if close {
                arrived = Some(tick);
            }
            prev_cat = s.cat().position();
        }
        assert!(arrived.is_some_and(|t| t > 0));
    }
}
