use glam::DVec2;

use super::components::Petals;
use super::FlowerConfig;
use crate::util::random::Random;

/// A timed stretch of a lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub tick: u32,
    pub ticks: u32,
}

impl Phase {
    pub fn new(ticks: u32) -> Self {
        Self { tick: 0, ticks }
    }

    /// Progress in [0, 1]. A zero-length phase is already complete.
    pub fn progress(&self) -> f64 {
        if self.ticks == 0 {
            return 1.0;
        }
        (self.tick as f64 / self.ticks as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.tick >= self.ticks
    }

    /// Count one tick and return the new progress.
    pub fn step(&mut self) -> f64 {
        if self.tick < self.ticks {
            self.tick += 1;
        }
        self.progress()
    }
}

/// Where a flower is in its life. Visuals are derived from this on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Growing into a closed bud.
    Budding(Phase),
    /// Closed bud waiting for the cat to brush past.
    Bud,
    /// Opening up.
    Blooming(Phase),
    /// Open; keeps growing and slowly spinning while it ages.
    Bloomed {
        aging: Phase,
        /// Accumulated spin in degrees.
        angle: f64,
        /// Ticks spent fully aged without being touched.
        untouched: u32,
    },
    /// Knocked off: jumps, falls under gravity, shrinks and fades.
    Falling { phase: Phase, vel: DVec2, angle: f64 },
    /// Left alone too long: shrinks in place.
    Wilting { phase: Phase, angle: f64 },
}

/// What happened to a flower during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    /// Just started falling; the caller owes a burst.
    Fell,
    /// Lifecycle finished; the caller should remove the flower.
    Gone,
}

impl Stage {
    /// Name for logs and debugging.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Budding(_) => "budding",
            Stage::Bud => "bud",
            Stage::Blooming(_) => "blooming",
            Stage::Bloomed { .. } => "bloomed",
            Stage::Falling { .. } => "falling",
            Stage::Wilting { .. } => "wilting",
        }
    }

    /// Current timed phase, if the stage has one.
    pub fn phase(&self) -> Option<Phase> {
        match *self {
            Stage::Budding(phase) | Stage::Blooming(phase) => Some(phase),
            Stage::Bloomed { aging, .. } => Some(aging),
            Stage::Falling { phase, .. } | Stage::Wilting { phase, .. } => Some(phase),
            Stage::Bud => None,
        }
    }

    /// Advance one tick. `touched` is whether the cat overlaps the flower.
    /// Falling flowers move `pos`.
    pub fn step(
        &mut self,
        pos: &mut DVec2,
        petals: &Petals,
        touched: bool,
        cfg: &FlowerConfig,
        rng: &mut impl Random,
    ) -> Outcome {
        match self {
            Stage::Budding(phase) => {
                phase.step();
                if phase.is_complete() {
                    *self = Stage::Bud;
                }
            }
            Stage::Bud => {
                if touched {
                    *self = Stage::Blooming(Phase::new(petals.durations.blooming));
                }
            }
            Stage::Blooming(phase) => {
                phase.step();
                if phase.is_complete() {
                    *self = Stage::Bloomed {
                        aging: Phase::new(cfg.aging_ticks),
                        angle: 0.0,
                        untouched: 0,
                    };
                }
            }
            Stage::Bloomed {
                aging,
                angle,
                untouched,
            } => {
                aging.step();
                *angle = (*angle + petals.rotation_speed).rem_euclid(360.0);
                if aging.is_complete() {
                    if touched {
                        let [min_h, max_h] = cfg.horizontal_speed;
                        let [min_j, max_j] = cfg.jump_speed;
                        let vel = DVec2::new(
                            rng.sign() * rng.range(min_h, max_h),
                            rng.range(min_j, max_j),
                        );
                        *self = Stage::Falling {
                            phase: Phase::new(petals.durations.falling),
                            vel,
                            angle: *angle,
                        };
                        return Outcome::Fell;
                    }
                    *untouched = untouched.saturating_add(1);
                    if cfg.wilt_ticks.is_some_and(|limit| *untouched >= limit) {
                        *self = Stage::Wilting {
                            phase: Phase::new(petals.durations.falling),
                            angle: *angle,
                        };
                    }
                }
            }
            Stage::Falling { phase, vel, .. } => {
                vel.y += cfg.gravity;
                *pos += *vel;
                phase.step();
                if phase.is_complete() {
                    return Outcome::Gone;
                }
            }
            Stage::Wilting { phase, .. } => {
                phase.step();
                if phase.is_complete() {
                    return Outcome::Gone;
                }
            }
        }
        Outcome::Alive
    }

    /// Size relative to a fully opened flower, without the aging spurt.
    /// Drives the shadow.
    pub fn size_factor(&self) -> f64 {
        match self {
            Stage::Budding(phase) => phase.progress() * 0.5,
            Stage::Bud => 0.5,
            Stage::Blooming(phase) => 0.5 + phase.progress() * 0.5,
            Stage::Bloomed { .. } => 1.0,
            Stage::Falling { phase, .. } | Stage::Wilting { phase, .. } => 1.0 - phase.progress(),
        }
    }

    /// Visual scale relative to the flower's draw size, including the
    /// post-bloom growth spurt.
    pub fn scale(&self, cfg: &FlowerConfig) -> f64 {
        let full = 1.0 + cfg.aged_growth;
        match self {
            Stage::Bloomed { aging, .. } => 1.0 + aging.progress() * cfg.aged_growth,
            Stage::Falling { phase, .. } | Stage::Wilting { phase, .. } => {
                full * (1.0 - phase.progress())
            }
            _ => self.size_factor(),
        }
    }

    pub fn opacity(&self, cfg: &FlowerConfig) -> f64 {
        let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;
        match self {
            Stage::Budding(_) | Stage::Bud => cfg.opacity_bud,
            Stage::Blooming(phase) => lerp(cfg.opacity_bud, cfg.opacity_bloomed, phase.progress()),
            Stage::Bloomed { aging, .. } => {
                lerp(cfg.opacity_bloomed, cfg.opacity_aged, aging.progress())
            }
            Stage::Falling { phase, .. } | Stage::Wilting { phase, .. } => {
                cfg.opacity_aged * (1.0 - phase.progress())
            }
        }
    }

    /// Rotation in degrees, wrapped to [0, 360).
    pub fn rotation(&self, petals: &Petals) -> f64 {
        let degrees = match *self {
            Stage::Budding(phase) => petals.collapse_start_angle * (1.0 - phase.progress()),
            Stage::Bud => 0.0,
            Stage::Blooming(phase) => petals.expand_start_angle * (1.0 - phase.progress()),
            Stage::Bloomed { angle, .. } | Stage::Falling { angle, .. } => angle,
            Stage::Wilting { phase, angle } => angle + petals.wilt_end_angle * phase.progress(),
        };
        degrees.rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowers::components::PhaseDurations;
    use crate::util::random::Scripted;

    fn petals(ticks: u32) -> Petals {
        Petals {
            draw_size: 30.0,
            cell: 0,
            durations: PhaseDurations {
                budding: ticks,
                blooming: ticks,
                falling: ticks,
            },
            collapse_start_angle: 90.0,
            expand_start_angle: -60.0,
            wilt_end_angle: 45.0,
            rotation_speed: 0.5,
        }
    }

    /// Drive a stage until it leaves its current variant, touching always.
    fn run_until_change(stage: &mut Stage, petals: &Petals, cfg: &FlowerConfig) -> u32 {
        let label = stage.label();
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        let mut n = 0;
        while stage.label() == label {
            stage.step(&mut pos, petals, true, cfg, &mut rng);
            n += 1;
            assert!(n < 10_000);
        }
        n
    }

    #[test]
    fn zero_length_phase_completes_immediately() {
        let mut phase = Phase::new(0);
        assert_eq!(phase.progress(), 1.0);
        assert!(phase.is_complete());
        assert_eq!(phase.step(), 1.0);
        assert_eq!(phase.tick, 0);
    }

    #[test]
    fn bud_waits_for_touch() {
        let cfg = FlowerConfig::default();
        let p = petals(30);
        let mut stage = Stage::Bud;
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        for _ in 0..500 {
            assert_eq!(stage.step(&mut pos, &p, false, &cfg, &mut rng), Outcome::Alive);
        }
        assert_eq!(stage, Stage::Bud);
        stage.step(&mut pos, &p, true, &cfg, &mut rng);
        assert_eq!(stage, Stage::Blooming(Phase::new(30)));
    }

    #[test]
    fn aged_flower_needs_both_age_and_touch_to_fall() {
        let cfg = FlowerConfig::default();
        let p = petals(30);
        let mut stage = Stage::Bloomed {
            aging: Phase::new(cfg.aging_ticks),
            angle: 0.0,
            untouched: 0,
        };
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        for _ in 0..(cfg.aging_ticks - 1) {
            assert_eq!(stage.step(&mut pos, &p, true, &cfg, &mut rng), Outcome::Alive);
        }
        for _ in 0..100 {
            assert_eq!(stage.step(&mut pos, &p, false, &cfg, &mut rng), Outcome::Alive);
        }
        assert_eq!(stage.step(&mut pos, &p, true, &cfg, &mut rng), Outcome::Fell);
        match stage {
            Stage::Falling { vel, .. } => {
                // coin 0.5 -> negative direction, 0.5 through each range
                assert!((vel.x + 2.5).abs() < 1e-9);
                assert!((vel.y + 10.0).abs() < 1e-9);
            }
            other => panic!("expected falling, got {other:?}"),
        }
    }

    #[test]
    fn falling_obeys_gravity_and_finishes() {
        let cfg = FlowerConfig::default();
        let p = petals(4);
        let mut stage = Stage::Falling {
            phase: Phase::new(4),
            vel: DVec2::new(2.0, -10.0),
            angle: 12.0,
        };
        let mut pos = DVec2::new(100.0, 100.0);
        let mut rng = Scripted::constant(0.5);
        assert_eq!(stage.step(&mut pos, &p, false, &cfg, &mut rng), Outcome::Alive);
        assert!((pos - DVec2::new(102.0, 90.75)).length() < 1e-9);
        stage.step(&mut pos, &p, false, &cfg, &mut rng);
        stage.step(&mut pos, &p, false, &cfg, &mut rng);
        assert_eq!(stage.step(&mut pos, &p, false, &cfg, &mut rng), Outcome::Gone);
        assert_eq!(stage.rotation(&p), 12.0);
    }

    #[test]
    fn wilting_only_when_enabled() {
        let p = petals(10);
        let mut cfg = FlowerConfig::default();
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        let aged = Stage::Bloomed {
            aging: Phase { tick: 60, ticks: 60 },
            angle: 30.0,
            untouched: 0,
        };

        let mut stage = aged;
        for _ in 0..1000 {
            stage.step(&mut pos, &p, false, &cfg, &mut rng);
        }
        assert_eq!(stage.label(), "bloomed");

        cfg.wilt_ticks = Some(5);
        let mut stage = aged;
        for _ in 0..5 {
            stage.step(&mut pos, &p, false, &cfg, &mut rng);
        }
        assert_eq!(stage.label(), "wilting");
        let mut outcome = Outcome::Alive;
        for _ in 0..10 {
            outcome = stage.step(&mut pos, &p, false, &cfg, &mut rng);
        }
        assert_eq!(outcome, Outcome::Gone);
        assert_eq!(stage.rotation(&p), 32.5 + 45.0);
        assert_eq!(pos, DVec2::ZERO);
    }

    #[test]
    fn progress_monotonic_and_visuals_continuous() {
        let cfg = FlowerConfig::default();
        let p = petals(20);
        let mut stage = Stage::Budding(Phase::new(20));
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);

        let mut prev_label = stage.label();
        let mut prev_progress = stage.phase().map(|ph| ph.progress());
        let mut prev_scale = stage.scale(&cfg);
        let mut prev_opacity = stage.opacity(&cfg);
        loop {
            let outcome = stage.step(&mut pos, &p, true, &cfg, &mut rng);
            if outcome == Outcome::Gone {
                break;
            }
            let progress = stage.phase().map(|ph| ph.progress());
            if stage.label() == prev_label {
                if let (Some(a), Some(b)) = (prev_progress, progress) {
                    assert!(b >= a, "{} progress went backwards", stage.label());
                }
            } else if let Some(ph) = stage.phase() {
                assert_eq!(ph.tick, 0, "{} did not start at 0", stage.label());
            }
            let scale = stage.scale(&cfg);
            let opacity = stage.opacity(&cfg);
            assert!((scale - prev_scale).abs() <= 0.08, "scale jump into {}", stage.label());
            assert!((opacity - prev_opacity).abs() <= 0.08, "opacity jump into {}", stage.label());
            prev_label = stage.label();
            prev_progress = progress;
            prev_scale = scale;
            prev_opacity = opacity;
        }
    }

    #[test]
    fn aged_spin_stays_wrapped() {
        let cfg = FlowerConfig::default();
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        for speed in [0.9, -0.7] {
            let p = Petals {
                rotation_speed: speed,
                ..petals(10)
            };
            let mut stage = Stage::Bloomed {
                aging: Phase::new(cfg.aging_ticks),
                angle: 0.0,
                untouched: 0,
            };
            for _ in 0..100_000 {
                stage.step(&mut pos, &p, false, &cfg, &mut rng);
                let r = stage.rotation(&p);
                assert!((0.0..360.0).contains(&r), "rotation {r} escaped [0, 360)");
            }
            assert_eq!(stage.label(), "bloomed");
        }
    }

    #[test]
    fn twist_rotations_are_wrapped() {
        let p = petals(10);
        // expand_start_angle is -60
        let stage = Stage::Blooming(Phase::new(10));
        assert_eq!(stage.rotation(&p), 300.0);
        let wilting = Stage::Wilting {
            phase: Phase { tick: 10, ticks: 10 },
            angle: 350.0,
        };
        assert_eq!(wilting.rotation(&p), 35.0);
    }

    #[test]
    fn untouched_counter_saturates() {
        let cfg = FlowerConfig::default();
        let p = petals(10);
        let mut pos = DVec2::ZERO;
        let mut rng = Scripted::constant(0.5);
        let mut stage = Stage::Bloomed {
            aging: Phase { tick: 60, ticks: 60 },
            angle: 0.0,
            untouched: u32::MAX - 1,
        };
        for _ in 0..3 {
            assert_eq!(stage.step(&mut pos, &p, false, &cfg, &mut rng), Outcome::Alive);
        }
        match stage {
            Stage::Bloomed { untouched, .. } => assert_eq!(untouched, u32::MAX),
            other => panic!("expected bloomed, got {other:?}"),
        }
    }

    #[test]
    fn stage_durations_match_config() {
        let cfg = FlowerConfig::default();
        let p = petals(30);
        let mut stage = Stage::Budding(Phase::new(30));
        assert_eq!(run_until_change(&mut stage, &p, &cfg), 30);
        assert_eq!(stage, Stage::Bud);
        assert_eq!(run_until_change(&mut stage, &p, &cfg), 1);
        assert_eq!(run_until_change(&mut stage, &p, &cfg), 30);
        assert_eq!(run_until_change(&mut stage, &p, &cfg), cfg.aging_ticks);
        assert_eq!(stage.label(), "falling");
    }
}
