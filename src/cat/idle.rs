use std::num::NonZeroU32;

use super::animation::Sprite;
use crate::util::random::Random;

/// What the cat does while it isn't chasing.
///
/// Licking always carries a positive number of cycles left; the last
/// cycle hands back to sitting instead of reaching zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePhase {
    Sitting {
        sprite: Sprite,
        /// Animation frames shown since the cat last sat down or licked.
        idle_frames: u32,
    },
    Licking {
        sprite: Sprite,
        plays_left: NonZeroU32,
    },
}

impl IdlePhase {
    /// Fresh sit with a random variant.
    pub fn sit(rng: &mut impl Random) -> Self {
        IdlePhase::Sitting {
            sprite: roll_sit(rng),
            idle_frames: 0,
        }
    }

    pub fn sprite(&self) -> Sprite {
        match *self {
            IdlePhase::Sitting { sprite, .. } | IdlePhase::Licking { sprite, .. } => sprite,
        }
    }

    /// React to one completed animation cycle of `frames` frames.
    ///
    /// Sitting accumulates frames and starts licking once `threshold` is
    /// reached (re-rolling the sit variant otherwise). Licking counts down
    /// and returns to a fresh sit after the last play.
    pub fn on_cycle(
        self,
        frames: u32,
        threshold: u32,
        lick_plays: u32,
        rng: &mut impl Random,
    ) -> Self {
        match self {
            IdlePhase::Sitting { idle_frames, .. } => {
                let idle_frames = idle_frames + frames;
                if idle_frames >= threshold {
                    match NonZeroU32::new(lick_plays) {
                        Some(plays_left) => {
                            let sprite = roll_lick(rng);
                            log::debug!("cat starts {} for {lick_plays} plays", sprite.label());
                            IdlePhase::Licking { sprite, plays_left }
                        }
                        // Nothing to play: behave as if the lick just ended.
                        None => IdlePhase::sit(rng),
                    }
                } else {
                    IdlePhase::Sitting {
                        sprite: roll_sit(rng),
                        idle_frames,
                    }
                }
            }
            IdlePhase::Licking { sprite, plays_left } => {
                match NonZeroU32::new(plays_left.get() - 1) {
                    Some(plays_left) => IdlePhase::Licking { sprite, plays_left },
                    None => IdlePhase::sit(rng),
                }
            }
        }
    }
}

fn roll_sit(rng: &mut impl Random) -> Sprite {
    if rng.coin() {
        Sprite::Sit
    } else {
        Sprite::Sit2
    }
}

fn roll_lick(rng: &mut impl Random) -> Sprite {
    if rng.coin() {
        Sprite::Lick
    } else {
        Sprite::Lick2
    }
}
