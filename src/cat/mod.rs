pub mod animation;
pub mod idle;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::render::{Instance, Kind};
use crate::util::random::Random;
use animation::{AnimationState, Sprite};
use idle::IdlePhase;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    /// Fraction of the remaining distance covered per tick while running.
    pub run_speed: f64,
    /// Fraction of the remaining distance covered per tick while walking.
    pub walk_speed: f64,
    /// Start chasing when the lure is further than this (px).
    pub start_distance: f64,
    /// Stop chasing when the lure is closer than this (px).
    pub stop_distance: f64,
    /// Run instead of walk beyond this distance (px).
    pub run_distance: f64,
    pub ticks_per_frame_running: u32,
    pub ticks_per_frame_walking: u32,
    pub ticks_per_frame_idle: u32,
    /// Idle animation frames before the cat starts licking.
    pub lick_threshold: u32,
    /// Full lick cycles per lick bout.
    pub lick_plays: u32,
    /// Display scale of the 16px sprite.
    pub display_scale: f64,
}

impl Default for CatConfig {
    fn default() -> Self {
        Self {
            run_speed: 0.03,
            walk_speed: 0.015,
            start_distance: 200.0,
            stop_distance: 100.0,
            run_distance: 400.0,
            ticks_per_frame_running: 4,
            ticks_per_frame_walking: 6,
            ticks_per_frame_idle: 8,
            lick_threshold: 20,
            lick_plays: 2,
            display_scale: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Walk,
    Run,
}

/// Top-level behaviour. Position only changes while `Moving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle(IdlePhase),
    Moving(Gait),
}

impl Motion {
    pub fn sprite(&self) -> Sprite {
        match self {
            Motion::Idle(phase) => phase.sprite(),
            Motion::Moving(Gait::Walk) => Sprite::Walk,
            Motion::Moving(Gait::Run) => Sprite::Run,
        }
    }
}

/// The cat that chases the lure.
#[derive(Debug, Clone)]
pub struct Cat {
    pos: DVec2,
    motion: Motion,
    anim: AnimationState,
    /// Mirrored when the lure is to the left.
    facing_left: bool,
    config: CatConfig,
}

impl Cat {
    pub fn new(config: CatConfig, pos: DVec2, rng: &mut impl Random) -> Self {
        let motion = Motion::Idle(IdlePhase::sit(rng));
        Self {
            pos,
            motion,
            anim: AnimationState::new(motion.sprite()),
            facing_left: false,
            config,
        }
    }

    /// One tick of chasing `lure`.
    pub fn update(&mut self, lure: DVec2, lure_active: bool, rng: &mut impl Random) {
        let cfg = self.config;
        let delta = lure - self.pos;
        let dist = delta.length();
        let gait = if dist > cfg.run_distance {
            Gait::Run
        } else {
            Gait::Walk
        };

        let was_moving = matches!(self.motion, Motion::Moving(_));
        let moving = lure_active
            && if was_moving {
                dist >= cfg.stop_distance
            } else {
                dist > cfg.start_distance
            };

        self.motion = match (was_moving, moving) {
            (_, true) => Motion::Moving(gait),
            (true, false) => {
                log::debug!("cat settles at ({:.0}, {:.0})", self.pos.x, self.pos.y);
                Motion::Idle(IdlePhase::sit(rng))
            }
            (false, false) => self.motion,
        };
        if moving && !was_moving {
            log::debug!("cat starts chasing, {dist:.0}px away");
        }

        if moving {
            let speed = match gait {
                Gait::Run => cfg.run_speed,
                Gait::Walk => cfg.walk_speed,
            };
            self.pos += delta * speed;
        }

        self.facing_left = delta.x < 0.0;

        self.anim.set(self.motion.sprite());
        let ticks_per_frame = match self.motion {
            Motion::Idle(_) => cfg.ticks_per_frame_idle,
            Motion::Moving(Gait::Walk) => cfg.ticks_per_frame_walking,
            Motion::Moving(Gait::Run) => cfg.ticks_per_frame_running,
        };

        if self.anim.advance(ticks_per_frame) {
            if let Motion::Idle(phase) = self.motion {
                let frames = self.anim.sprite.frames() as u32;
                let next = phase.on_cycle(frames, cfg.lick_threshold, cfg.lick_plays, rng);
                self.motion = Motion::Idle(next);
                self.anim.set(next.sprite());
            }
        }
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving(_))
    }

    pub fn sprite(&self) -> Sprite {
        self.anim.sprite
    }

    pub fn frame(&self) -> u8 {
        self.anim.frame
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn build_instances(&self, buf: &mut Vec<Instance>) {
        let s = self.config.display_scale as f32;
        let mut inst = Instance::new(Kind::Cat, self.pos);
        inst.scale = [if self.facing_left { -s } else { s }, s];
        inst.variant = self.anim.sprite as u32;
        inst.frame = self.anim.frame as u32;
        buf.push(inst);
    }
}
